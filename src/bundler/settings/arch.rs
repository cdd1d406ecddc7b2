//! CPU architecture types and utilities.

use std::fmt;

/// CPU architecture, for both the application being bundled and the host
/// running the bundler.
///
/// The host architecture parameterizes managed tool artifact names (the
/// correct prebuilt `linuxdeploy` for the running CPU, for example), while the
/// application's architecture, detected from its target triple, shows up in
/// artifact file names.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pipeline::bundler::Arch;
///
/// let arch = Arch::host().unwrap_or(Arch::X86_64);
/// println!("Host architecture: {}", arch);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Arch {
    /// x86_64 / AMD64 (64-bit)
    X86_64,
    /// x86 / i686 (32-bit)
    X86,
    /// AArch64 / ARM64 (64-bit)
    AArch64,
    /// ARM with hard-float (32-bit)
    Armhf,
    /// RISC-V (64-bit)
    Riscv64,
}

impl Arch {
    /// Architecture of the machine running the bundler.
    ///
    /// Returns `None` for CPUs no supported toolchain targets.
    pub fn host() -> Option<Self> {
        Self::from_rust_arch(std::env::consts::ARCH)
    }

    /// Maps a `std::env::consts::ARCH` value.
    pub fn from_rust_arch(arch: &str) -> Option<Self> {
        match arch {
            "x86_64" => Some(Self::X86_64),
            "x86" => Some(Self::X86),
            "aarch64" => Some(Self::AArch64),
            "arm" => Some(Self::Armhf),
            "riscv64" => Some(Self::Riscv64),
            _ => None,
        }
    }

    /// Detects the architecture from a Rust target triple.
    ///
    /// Falls back to x86_64 for unrecognized triples.
    pub fn from_target_triple(target: &str) -> Self {
        if target.starts_with("x86_64") {
            Self::X86_64
        } else if target.starts_with('i') {
            Self::X86
        } else if target.starts_with("aarch64") {
            Self::AArch64
        } else if target.starts_with("arm") {
            Self::Armhf
        } else if target.starts_with("riscv64") {
            Self::Riscv64
        } else {
            Self::X86_64
        }
    }

    /// Architecture suffix used by AppImage tooling (`linuxdeploy-<arch>.AppImage`).
    pub fn appimage_name(self) -> Option<&'static str> {
        match self {
            Self::X86_64 => Some("x86_64"),
            Self::X86 => Some("i386"),
            Self::AArch64 => Some("aarch64"),
            Self::Armhf => Some("armhf"),
            Self::Riscv64 => None,
        }
    }

    /// Architecture string understood by NSIS.
    pub fn nsis_name(self) -> Option<&'static str> {
        match self {
            Self::X86_64 => Some("x64"),
            Self::X86 => Some("x86"),
            Self::AArch64 => Some("arm64"),
            _ => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X86_64 => "x86_64",
            Self::X86 => "x86",
            Self::AArch64 => "aarch64",
            Self::Armhf => "armhf",
            Self::Riscv64 => "riscv64",
        };
        f.write_str(name)
    }
}
