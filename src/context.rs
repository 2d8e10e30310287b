//! Explicit per-run context, threaded through every component.

/// Identity of one import/export run: which tenant's database is being
/// touched and which table is the destination.
///
/// There is deliberately no ambient or global equivalent; every
/// component takes the context as an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportContext {
    tenant: String,
    table: String,
}

impl ImportContext {
    /// Create a context for one run.
    #[must_use]
    pub fn new(tenant: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            table: table.into(),
        }
    }

    /// The tenant this run belongs to. Used for backup artifact naming
    /// and log correlation, never interpolated into SQL.
    #[must_use]
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// The destination table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}
