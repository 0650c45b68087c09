//! Owner identity capability

/// Identity an owner type must expose for key derivation
///
/// `KIND` names the owner type inside keys (conventionally lowercase);
/// `identity` returns the owner's stable unique id, rendered as a string.
/// Both must stay constant for the lifetime of the owner's identity.
pub trait MetadataOwner {
    /// Type identifier interpolated as `%(identifier)s`
    const KIND: &'static str;

    /// Unique id interpolated as `%(id)s`
    fn identity(&self) -> String;
}
