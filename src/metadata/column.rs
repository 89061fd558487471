use crate::types::{SqlType, TypeKey, ValueConverter};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Metadata binding one database column to an entity property.
///
/// Descriptors are configured through `&mut self` setters while entity
/// metadata is being built, then shared. The resolved converter is memoized
/// in a single-assignment cell: once set it never changes, and setters called
/// afterwards do not affect it.
#[derive(Debug, Default)]
pub struct ColumnDescriptor {
    column: String,
    alias: Vec<String>,
    property: String,
    property_type: Option<TypeKey>,
    jdbc_type: Option<SqlType>,
    declared_handler: Option<Arc<dyn ValueConverter>>,
    mask_kind: Option<String>,
    resolved: OnceCell<Arc<dyn ValueConverter>>,
    ignored: bool,
}

impl ColumnDescriptor {
    pub fn new(column: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            property: property.into(),
            ..Self::default()
        }
    }

    pub fn with_property_type(mut self, property_type: TypeKey) -> Self {
        self.property_type = Some(property_type);
        self
    }

    pub fn with_alias<S: Into<String>>(mut self, alias: impl IntoIterator<Item = S>) -> Self {
        self.alias = alias.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_jdbc_type(mut self, jdbc_type: SqlType) -> Self {
        self.jdbc_type = Some(jdbc_type);
        self
    }

    pub fn with_declared_handler(mut self, handler: Arc<dyn ValueConverter>) -> Self {
        self.declared_handler = Some(handler);
        self
    }

    pub fn with_mask_kind(mut self, mask_kind: impl Into<String>) -> Self {
        self.mask_kind = Some(mask_kind.into());
        self
    }

    pub fn with_ignored(mut self, ignored: bool) -> Self {
        self.ignored = ignored;
        self
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn set_column(&mut self, column: impl Into<String>) {
        self.column = column.into();
    }

    pub fn alias(&self) -> &[String] {
        &self.alias
    }

    pub fn set_alias(&mut self, alias: Vec<String>) {
        self.alias = alias;
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn set_property(&mut self, property: impl Into<String>) {
        self.property = property.into();
    }

    pub fn property_type(&self) -> Option<&TypeKey> {
        self.property_type.as_ref()
    }

    pub fn set_property_type(&mut self, property_type: Option<TypeKey>) {
        self.property_type = property_type;
    }

    pub fn jdbc_type(&self) -> Option<SqlType> {
        self.jdbc_type
    }

    pub fn set_jdbc_type(&mut self, jdbc_type: Option<SqlType>) {
        self.jdbc_type = jdbc_type;
    }

    pub fn declared_handler(&self) -> Option<&Arc<dyn ValueConverter>> {
        self.declared_handler.as_ref()
    }

    /// Has no effect on a descriptor that has already been resolved
    pub fn set_declared_handler(&mut self, handler: Option<Arc<dyn ValueConverter>>) {
        self.declared_handler = handler;
    }

    pub fn mask_kind(&self) -> Option<&str> {
        self.mask_kind.as_deref()
    }

    pub fn set_mask_kind(&mut self, mask_kind: Option<String>) {
        self.mask_kind = mask_kind;
    }

    /// Mask kind if it is present and not blank
    pub fn effective_mask_kind(&self) -> Option<&str> {
        self.mask_kind
            .as_deref()
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub fn set_ignored(&mut self, ignored: bool) {
        self.ignored = ignored;
    }

    /// The memoized converter, without triggering resolution
    pub fn resolved_handler(&self) -> Option<&Arc<dyn ValueConverter>> {
        self.resolved.get()
    }

    /// Store `converter` unless another one got there first; returns the winner
    pub(crate) fn memoize(&self, converter: Arc<dyn ValueConverter>) -> Arc<dyn ValueConverter> {
        self.resolved.get_or_init(|| converter).clone()
    }

    /// Whether `label` names this column, either directly or through an alias
    pub fn matches_label(&self, label: &str) -> bool {
        self.column.eq_ignore_ascii_case(label) || self.alias_position(label).is_some()
    }

    /// Index of the first alias equal to `label`
    pub fn alias_position(&self, label: &str) -> Option<usize> {
        self.alias.iter().position(|alias| alias.eq_ignore_ascii_case(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PassthroughConverter;

    #[test]
    fn test_builder_and_setters() {
        let mut descriptor = ColumnDescriptor::new("user_name", "userName")
            .with_property_type(TypeKey::Text)
            .with_alias(["name", "login"])
            .with_jdbc_type(SqlType::Varchar);

        assert_eq!(descriptor.column(), "user_name");
        assert_eq!(descriptor.property(), "userName");
        assert_eq!(descriptor.property_type(), Some(&TypeKey::Text));
        assert_eq!(descriptor.alias(), ["name".to_string(), "login".to_string()]);
        assert_eq!(descriptor.jdbc_type(), Some(SqlType::Varchar));
        assert!(!descriptor.is_ignored());

        descriptor.set_ignored(true);
        descriptor.set_column("login_name");
        assert!(descriptor.is_ignored());
        assert_eq!(descriptor.column(), "login_name");
    }

    #[test]
    fn test_blank_mask_kind_is_not_effective() {
        let mut descriptor = ColumnDescriptor::new("phone", "phone").with_mask_kind("   ");
        assert_eq!(descriptor.mask_kind(), Some("   "));
        assert_eq!(descriptor.effective_mask_kind(), None);

        descriptor.set_mask_kind(Some(" mobile ".into()));
        assert_eq!(descriptor.effective_mask_kind(), Some("mobile"));
    }

    #[test]
    fn test_memoize_keeps_first_value() {
        let descriptor = ColumnDescriptor::new("id", "id");
        assert!(descriptor.resolved_handler().is_none());

        let first: Arc<dyn ValueConverter> = Arc::new(PassthroughConverter);
        let second: Arc<dyn ValueConverter> = Arc::new(PassthroughConverter);
        let winner = descriptor.memoize(first.clone());
        let loser = descriptor.memoize(second);

        assert!(Arc::ptr_eq(&winner, &first));
        assert!(Arc::ptr_eq(&loser, &first));
        assert!(Arc::ptr_eq(descriptor.resolved_handler().unwrap(), &first));
    }

    #[test]
    fn test_label_matching() {
        let descriptor = ColumnDescriptor::new("user_name", "userName").with_alias(["uname", "login"]);
        assert!(descriptor.matches_label("USER_NAME"));
        assert!(descriptor.matches_label("login"));
        assert_eq!(descriptor.alias_position("login"), Some(1));
        assert!(!descriptor.matches_label("userName"));
    }
}
