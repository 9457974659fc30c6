use crate::error::{BumpError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version triple, ordered by major, then minor, then patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Baseline used when a repository has no version tags yet
    pub const ZERO: Version = Version::new(0, 0, 0);

    /// Create a new version
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    fn segments(&self) -> [u64; 3] {
        [self.major, self.minor, self.patch]
    }

    fn from_segments([major, minor, patch]: [u64; 3]) -> Self {
        Version::new(major, minor, patch)
    }

    /// Return the next version for `segment`.
    ///
    /// The selected component is incremented and every component of lower
    /// precedence is reset to zero:
    /// - **Major**: major += 1, minor = 0, patch = 0
    /// - **Minor**: minor += 1, patch = 0
    /// - **Patch**: patch += 1
    ///
    /// # Errors
    /// [`BumpError::BumpOverflow`] when the selected component is already
    /// `u64::MAX`; no greater version exists for that segment.
    ///
    /// # Example
    /// ```
    /// use bumpversion::domain::{Segment, Version};
    ///
    /// let v = Version::new(0, 1, 1);
    /// assert_eq!(v.bump(Segment::Major).unwrap(), Version::new(1, 0, 0));
    /// assert_eq!(v.bump(Segment::Minor).unwrap(), Version::new(0, 2, 0));
    /// assert_eq!(v.bump(Segment::Patch).unwrap(), Version::new(0, 1, 2));
    /// ```
    pub fn bump(self, segment: Segment) -> Result<Self> {
        self.checked_bump(segment).ok_or(BumpError::BumpOverflow {
            version: self,
            segment,
        })
    }

    /// Like [`Version::bump`], returning `None` on overflow
    pub fn checked_bump(self, segment: Segment) -> Option<Self> {
        let index = segment.index();
        let mut parts = self.segments();
        parts[index] = parts[index].checked_add(1)?;
        for part in parts.iter_mut().skip(index + 1) {
            *part = 0;
        }
        Some(Version::from_segments(parts))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::ZERO
    }
}

/// Position within a version triple, in order of precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    Major,
    Minor,
    Patch,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Major, Segment::Minor, Segment::Patch];

    /// Index of this segment within the `(major, minor, patch)` triple
    pub fn index(self) -> usize {
        match self {
            Segment::Major => 0,
            Segment::Minor => 1,
            Segment::Patch => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Major => "major",
            Segment::Minor => "minor",
            Segment::Patch => "patch",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "major" => Ok(Segment::Major),
            "minor" => Ok(Segment::Minor),
            "patch" => Ok(Segment::Patch),
            other => Err(BumpError::usage(format!(
                "unknown version segment '{}': expected major, minor or patch",
                other
            ))),
        }
    }
}
