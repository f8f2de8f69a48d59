use std::fmt;

/// CPU architecture variants with a stable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
  X86_64,
  Aarch64,
  X86,
  Arm,
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86_64" => Some(Self::X86_64),
      "aarch64" => Some(Self::Aarch64),
      "x86" => Some(Self::X86),
      "arm" => Some(Self::Arm),
      _ => None,
    }
  }

  /// Returns the lowercase identifier used in arch-map keys and templates.
  ///
  /// Manifests key their arch maps as `linux_amd64`, `darwin_arm64`, etc.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "amd64",
      Self::Aarch64 => "arm64",
      Self::X86 => "386",
      Self::Arm => "arm",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
