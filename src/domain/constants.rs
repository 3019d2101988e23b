/// Identifier value meaning "this file was never assigned one".
///
/// Manually normalized access derivatives are handed to the checker with
/// this literal in place of a real identifier.
pub const NO_FILE_UUID: &str = "None";

/// Parent-directory suffix (component form) that marks the output location
/// of manually normalized access derivatives.
pub const ACCESS_DERIVATIVE_PARENT_SUFFIX: &str = "DIP/objects";

/// Length of the `<uuid>-` prefix prepended to derivative filenames during
/// normalization: a canonical 36-character identifier plus one separator.
pub const UUID_PREFIX_LEN: usize = 37;

/// Recorded original location of files staged for manual access
/// normalization, minus the filename.
pub const MANUAL_ACCESS_LOCATION_PREFIX: &str =
    "%transferDirectory%objects/manualNormalization/access/";

/// Placeholder for the shared storage root in registry package paths.
pub const SHARED_PATH_TOKEN: &str = "%sharedPath%";

/// Tokens substituted into inline rule command strings.
pub const FILE_UUID_TOKEN: &str = "%fileUUID%";
pub const PACKAGE_UUID_TOKEN: &str = "%SIPUUID%";
pub const TYPE_TOKEN: &str = "%type%";

/// Value substituted for [`TYPE_TOKEN`]; this checker only targets files.
pub const TYPE_VALUE: &str = "file";

/// Policy-definitions directory under the shared root, unless overridden
/// by configuration.
pub const POLICIES_SUBDIR: &str = "policies";

/// Event type recorded for every executed rule (PREMIS controlled vocab).
pub const VALIDATION_EVENT_TYPE: &str = "validation";

/// Category directories under `logs/policies/` in the package tree.
pub const CATEGORY_PRESERVATION: &str = "preservationDerivatives";
pub const CATEGORY_ORIGINALS: &str = "originals";

/// Description markers for the legacy policy-check detection heuristic,
/// applied only to rules that carry no structured `policy_check` tag.
pub const LEGACY_POLICY_CHECK_MARKER: &str = "Check against policy";
pub const LEGACY_POLICY_TOOL_MARKER: &str = "MediaConch";

/// Verdict string treated as a pass in decoded command output.
pub const PASS_OUTCOME: &str = "pass";
