mod error;
mod range;

pub use error::VersionError;
pub use range::DeclaredRange;

use relay_core::BumpType;
use semver::Version;

/// Computes the next stable version for `version` under `bump_type`.
///
/// Pre-release and build metadata are dropped. A pre-release whose lower
/// components are already zeroed releases as its own stable version, so
/// `2.0.0-beta.1` bumped as major becomes `2.0.0`, not `3.0.0`.
#[must_use]
pub fn bump_version(version: &Version, bump_type: BumpType) -> Version {
    let prerelease = is_prerelease(version);
    let (mut major, mut minor, mut patch) = (version.major, version.minor, version.patch);

    match bump_type {
        BumpType::Major => {
            if !(prerelease && minor == 0 && patch == 0) {
                major += 1;
            }
            minor = 0;
            patch = 0;
        }
        BumpType::Minor => {
            if !(prerelease && patch == 0) {
                minor += 1;
            }
            patch = 0;
        }
        BumpType::Patch => {
            if !prerelease {
                patch += 1;
            }
        }
    }

    Version::new(major, minor, patch)
}

#[must_use]
pub fn is_prerelease(version: &Version) -> bool {
    !version.pre.is_empty()
}

#[must_use]
pub fn max_bump_type(bumps: &[BumpType]) -> Option<BumpType> {
    bumps.iter().copied().max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).expect("valid version")
    }

    #[test]
    fn test_bump_patch() {
        assert_eq!(bump_version(&v("1.2.3"), BumpType::Patch), v("1.2.4"));
    }

    #[test]
    fn test_bump_minor() {
        assert_eq!(bump_version(&v("1.2.3"), BumpType::Minor), v("1.3.0"));
    }

    #[test]
    fn test_bump_major() {
        assert_eq!(bump_version(&v("1.2.3"), BumpType::Major), v("2.0.0"));
    }

    #[test]
    fn bump_drops_build_metadata() {
        assert_eq!(bump_version(&v("1.2.3+build.7"), BumpType::Patch), v("1.2.4"));
    }

    #[test]
    fn prerelease_patch_releases_stable() {
        assert_eq!(bump_version(&v("1.2.3-rc.1"), BumpType::Patch), v("1.2.3"));
    }

    #[test]
    fn prerelease_minor_with_zero_patch_releases_stable() {
        assert_eq!(bump_version(&v("1.3.0-alpha"), BumpType::Minor), v("1.3.0"));
    }

    #[test]
    fn prerelease_minor_with_nonzero_patch_increments_minor() {
        assert_eq!(bump_version(&v("1.3.2-alpha"), BumpType::Minor), v("1.4.0"));
    }

    #[test]
    fn prerelease_major_with_zeroed_components_releases_stable() {
        assert_eq!(bump_version(&v("2.0.0-beta.1"), BumpType::Major), v("2.0.0"));
    }

    #[test]
    fn prerelease_major_with_nonzero_minor_increments_major() {
        assert_eq!(bump_version(&v("2.1.0-beta.1"), BumpType::Major), v("3.0.0"));
    }

    #[test]
    fn bump_from_zero_version() {
        assert_eq!(bump_version(&v("0.1.0"), BumpType::Major), v("1.0.0"));
        assert_eq!(bump_version(&v("0.1.0"), BumpType::Minor), v("0.2.0"));
    }

    #[test]
    fn max_bump_type_empty_is_none() {
        assert_eq!(max_bump_type(&[]), None);
    }

    #[test]
    fn max_bump_type_picks_largest() {
        assert_eq!(
            max_bump_type(&[BumpType::Patch, BumpType::Minor, BumpType::Patch]),
            Some(BumpType::Minor)
        );
    }
}
