use miette::Result;

/// Represents an unvalidated configuration structure that has to be
/// resolved before use, where resolution requires some additional
/// context (e.g. the backend id an entry belongs to, or the default
/// values unset fields fall back to).
pub trait ResolvableConfigurationWithContext {
    type Context;
    type Resolved;

    /// Resolve the configuration into its `Resolved` type.
    /// If the resolution / validation fails, you may return `Err` to indicate
    /// that the configuration is invalid.
    fn resolve(self, context: Self::Context) -> Result<Self::Resolved>;
}
