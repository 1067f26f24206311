use semver::Version;

/// Parse a version tag into a semver::Version, normalizing partial versions.
///
/// Strips a leading `v` and pads partial versions with zeros.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "v1.2" -> Version(1, 2, 0)
/// - "1.2.3-rc.1" -> Version(1, 2, 3-rc.1)
/// - "master" -> None
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);

    // Pre-release and build metadata may contain dots of their own
    let core_end = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(core_end);

    let normalized = match core.split('.').count() {
        1 => format!("{}.0.0{}", core, suffix),
        2 => format!("{}.0{}", core, suffix),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Find the semantically maximum version from a list
///
/// Tags that are not semantic versions (branch names, `latest`, ...) are skipped.
/// Among tags that parse to the same version, the last one listed wins.
pub fn find_semantic_max<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .filter_map(|v| parse_version(v).map(|parsed| (v, parsed)))
        .max_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(tag, _)| tag)
}
