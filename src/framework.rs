//! Target framework monikers
//!
//! Maps an MSBuild `TargetFrameworkVersion` / `TargetFrameworkProfile` pair
//! to the short moniker NuGet uses for `lib\<moniker>` folders.

/// Resolve the moniker for a framework version such as `v4.5` and an
/// optional profile such as `Client`.
///
/// The leading `v` is optional. Returns `None` for versions without a
/// known moniker.
pub fn target_framework_moniker(version: &str, profile: Option<&str>) -> Option<&'static str> {
    let version = version.trim();
    let version = version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version);
    let client = profile.is_some_and(|p| p.trim().eq_ignore_ascii_case("client"));

    let moniker = match version {
        "2.0" => "net20",
        "3.0" => "net30",
        "3.5" if client => "net35-client",
        "3.5" => "net35",
        "4.0" if client => "net40-client",
        "4.0" => "net40",
        "4.5" => "net45",
        "4.5.1" => "net451",
        "4.5.2" => "net452",
        "4.6" => "net46",
        "4.6.1" => "net461",
        "4.6.2" => "net462",
        "4.7" => "net47",
        "4.7.1" => "net471",
        "4.7.2" => "net472",
        "4.8" => "net48",
        "4.8.1" => "net481",
        _ => return None,
    };
    Some(moniker)
}
