use uuid::Uuid;

/// Extension given to every generated document.
pub const XML_EXTENSION: &str = "xml";

/// Removes the last `.ext` suffix from a filename.
///
/// Only the final dot counts, so `report.v2.pdf` becomes `report.v2`.
/// A name without a dot is returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

/// Name offered to the client when downloading the XML for `original`.
pub fn download_filename(original: &str) -> String {
    format!("{}.{XML_EXTENSION}", strip_extension(original))
}

/// Collision-resistant storage name: the token prefix keeps repeated uploads of
/// the same file apart.
pub fn generated_filename(original: &str, token: Uuid) -> String {
    format!("{token}_{}.{XML_EXTENSION}", strip_extension(original))
}
