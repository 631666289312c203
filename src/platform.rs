use crate::types::PlatformInfo;

/// Host platform in the naming used by Go release archives.
pub fn get_system_info() -> PlatformInfo {
    platform_from(std::env::consts::OS, std::env::consts::ARCH)
}

pub fn platform_from(os: &str, arch: &str) -> PlatformInfo {
    let normalized_os = match os {
        "macos" => "darwin",
        other => other,
    };

    let normalized_arch = match arch {
        "x86_64" => "amd64",
        "x86" | "i686" | "i386" => "386",
        "aarch64" => "arm64",
        "arm" => "armv6l",
        "powerpc64" => "ppc64",
        "powerpc64le" => "ppc64le",
        "loongarch64" => "loong64",
        other => other,
    };

    PlatformInfo {
        os: normalized_os.to_string(),
        arch: normalized_arch.to_string(),
    }
}

/// Applies `--os`/`--arch` overrides on top of the detected platform.
pub fn resolve_platform(os: Option<&str>, arch: Option<&str>) -> PlatformInfo {
    let detected = get_system_info();
    let info = PlatformInfo {
        os: os.map(str::to_string).unwrap_or(detected.os),
        arch: arch.map(str::to_string).unwrap_or(detected.arch),
    };
    tracing::debug!("Target platform: {}/{}", info.os, info.arch);
    info
}
