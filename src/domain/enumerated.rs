//! Enumerated attribute mapping.
//!
//! An [`AttributeRegistry`] is the single mapping table between symbolic
//! values (`"inactive"`) and their persisted representation (`1`). It is
//! built once from a list of [`AttributeDecl`]s and is immutable afterwards.
//! Every write path encodes through it and every read path decodes through
//! it, so single-row and batch writes can never disagree on a code.
//!
//! Two representation rules exist:
//!
//! - [`Representation::Positional`]: the code is the member's index.
//! - [`Representation::Explicit`]: each member carries its own code, gaps
//!   and reordering allowed.
//!
//! Attributes declared `multiple` are persisted as an ordered list of their
//! symbolic strings instead of a code.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// How a member's persisted code is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representation {
    /// Code equals the declaration index.
    Positional,
    /// One explicit code per member, parallel to the member list.
    Explicit(Vec<i32>),
}

/// A declared member with its persisted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Member {
    pub symbol: &'static str,
    pub code: i32,
}

/// Caller-supplied value for an enumerated attribute.
///
/// Deserializes untagged, so JSON `"inactive"`, `1` and
/// `["reading", "travel"]` are all accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Code(i32),
    Symbol(String),
    Symbols(Vec<String>),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Code(code) => write!(f, "{}", code),
            AttributeValue::Symbol(symbol) => write!(f, "{}", symbol),
            AttributeValue::Symbols(symbols) => write!(f, "[{}]", symbols.join(", ")),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Symbol(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Symbol(s)
    }
}

impl From<i32> for AttributeValue {
    fn from(code: i32) -> Self {
        AttributeValue::Code(code)
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(symbols: Vec<&str>) -> Self {
        AttributeValue::Symbols(symbols.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(symbols: Vec<String>) -> Self {
        AttributeValue::Symbols(symbols)
    }
}

/// Persisted representation of an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    Code(i32),
    List(Vec<String>),
}

/// Decoded (symbolic) attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbolic {
    One(&'static str),
    Many(Vec<&'static str>),
}

impl From<Symbolic> for AttributeValue {
    fn from(value: Symbolic) -> Self {
        match value {
            Symbolic::One(symbol) => AttributeValue::from(symbol),
            Symbolic::Many(symbols) => AttributeValue::from(symbols),
        }
    }
}

/// Declaration of one enumerated attribute, consumed by
/// [`RegistryBuilder::declare`].
#[derive(Debug, Clone)]
pub struct AttributeDecl {
    name: &'static str,
    members: Vec<&'static str>,
    representation: Representation,
    default: Option<&'static str>,
    multiple: bool,
    scope: bool,
    predicates: bool,
}

/// Start declaring an attribute's symbolic domain.
pub fn declare(
    name: &'static str,
    members: &[&'static str],
    representation: Representation,
) -> AttributeDecl {
    AttributeDecl {
        name,
        members: members.to_vec(),
        representation,
        default: None,
        multiple: false,
        scope: false,
        predicates: false,
    }
}

impl AttributeDecl {
    /// Member used when a write omits the attribute.
    pub fn default(mut self, member: &'static str) -> Self {
        self.default = Some(member);
        self
    }

    /// Set-valued attribute persisted as a list of symbols.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Expose per-member query scopes.
    pub fn scope(mut self) -> Self {
        self.scope = true;
        self
    }

    /// Expose per-member boolean predicates.
    pub fn predicates(mut self) -> Self {
        self.predicates = true;
        self
    }

    fn build(self) -> AppResult<EnumAttribute> {
        let invalid = |msg: String| AppError::InvalidDeclaration(format!("{}: {}", self.name, msg));

        if self.members.is_empty() {
            return Err(invalid("no members".into()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.members.iter().find(|m| !seen.insert(**m)) {
            return Err(invalid(format!("duplicate member '{}'", dup)));
        }

        let codes: Vec<i32> = match &self.representation {
            Representation::Positional => (0..self.members.len() as i32).collect(),
            Representation::Explicit(codes) => {
                if self.multiple {
                    return Err(invalid("multiple attributes persist symbols, not codes".into()));
                }
                if codes.len() != self.members.len() {
                    return Err(invalid(format!(
                        "{} codes for {} members",
                        codes.len(),
                        self.members.len()
                    )));
                }
                let mut seen = HashSet::new();
                if let Some(dup) = codes.iter().find(|c| !seen.insert(**c)) {
                    return Err(invalid(format!("duplicate code {}", dup)));
                }
                codes.clone()
            }
        };

        if let Some(default) = self.default {
            if !self.members.contains(&default) {
                return Err(invalid(format!("default '{}' is not a member", default)));
            }
        }

        let members = self
            .members
            .iter()
            .zip(codes)
            .map(|(symbol, code)| Member {
                symbol: *symbol,
                code,
            })
            .collect();

        Ok(EnumAttribute {
            name: self.name,
            members,
            default: self.default,
            multiple: self.multiple,
            scope: self.scope,
            predicates: self.predicates,
        })
    }
}

/// A registered attribute: its members, codes and options.
#[derive(Debug, Clone)]
pub struct EnumAttribute {
    name: &'static str,
    members: Vec<Member>,
    default: Option<&'static str>,
    multiple: bool,
    scope: bool,
    predicates: bool,
}

impl EnumAttribute {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared members in declaration order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Declared symbols in declaration order.
    pub fn values(&self) -> Vec<&'static str> {
        self.members.iter().map(|m| m.symbol).collect()
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn has_scope(&self) -> bool {
        self.scope
    }

    pub fn has_predicates(&self) -> bool {
        self.predicates
    }

    pub fn default_member(&self) -> Option<Member> {
        self.default.and_then(|symbol| self.find_value(symbol))
    }

    pub fn find_value(&self, symbol: &str) -> Option<Member> {
        self.members.iter().copied().find(|m| m.symbol == symbol)
    }

    pub fn find_code(&self, code: i32) -> Option<Member> {
        self.members.iter().copied().find(|m| m.code == code)
    }

    /// Persisted form used when a write omits the attribute.
    ///
    /// Single-valued attributes without a default have none; multiple
    /// attributes default to the empty list.
    pub fn default_persisted(&self) -> Option<Persisted> {
        if self.multiple {
            let list = self.default.map(|d| vec![d.to_string()]).unwrap_or_default();
            return Some(Persisted::List(list));
        }
        self.default_member().map(|m| Persisted::Code(m.code))
    }

    /// Encode a caller value into its persisted form.
    pub fn encode(&self, value: &AttributeValue) -> AppResult<Persisted> {
        if self.multiple {
            self.encode_list(value).map(Persisted::List)
        } else {
            self.encode_code(value).map(Persisted::Code)
        }
    }

    /// Encode a single-valued attribute. Accepts the symbol or the code itself.
    pub fn encode_code(&self, value: &AttributeValue) -> AppResult<i32> {
        let member = match value {
            AttributeValue::Symbol(symbol) => self.find_value(symbol),
            AttributeValue::Code(code) => self.find_code(*code),
            AttributeValue::Symbols(_) => None,
        };
        member
            .filter(|_| !self.multiple)
            .map(|m| m.code)
            .ok_or_else(|| AppError::invalid_member(self.name, value))
    }

    /// Encode a multiple attribute. Duplicates collapse, first occurrence wins.
    pub fn encode_list(&self, value: &AttributeValue) -> AppResult<Vec<String>> {
        if !self.multiple {
            return Err(AppError::invalid_member(self.name, value));
        }
        let symbols: Vec<&str> = match value {
            AttributeValue::Symbols(symbols) => symbols.iter().map(String::as_str).collect(),
            AttributeValue::Symbol(symbol) => vec![symbol.as_str()],
            AttributeValue::Code(_) => return Err(AppError::invalid_member(self.name, value)),
        };

        let mut list: Vec<String> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let member = self
                .find_value(symbol)
                .ok_or_else(|| AppError::invalid_member(self.name, symbol))?;
            if !list.iter().any(|s| s == member.symbol) {
                list.push(member.symbol.to_string());
            }
        }
        Ok(list)
    }

    /// Decode a persisted value back to its symbolic form.
    pub fn decode(&self, persisted: &Persisted) -> AppResult<Symbolic> {
        match persisted {
            Persisted::Code(code) if !self.multiple => self.decode_code(*code).map(Symbolic::One),
            Persisted::List(list) if self.multiple => self.decode_list(list).map(Symbolic::Many),
            Persisted::Code(code) => Err(AppError::unknown_code(self.name, code)),
            Persisted::List(list) => Err(AppError::unknown_code(
                self.name,
                format!("[{}]", list.join(", ")),
            )),
        }
    }

    pub fn decode_code(&self, code: i32) -> AppResult<&'static str> {
        self.find_code(code)
            .filter(|_| !self.multiple)
            .map(|m| m.symbol)
            .ok_or_else(|| AppError::unknown_code(self.name, code))
    }

    pub fn decode_list<S: AsRef<str>>(&self, list: &[S]) -> AppResult<Vec<&'static str>> {
        list.iter()
            .map(|s| {
                self.find_value(s.as_ref())
                    .map(|m| m.symbol)
                    .ok_or_else(|| AppError::unknown_code(self.name, s.as_ref()))
            })
            .collect()
    }

    /// Persisted codes to filter on for a set of members.
    ///
    /// Only available for attributes declared with `scope`.
    pub fn scope_codes<S: AsRef<str>>(&self, symbols: &[S]) -> AppResult<Vec<i32>> {
        if !self.scope || self.multiple {
            return Err(AppError::validation(format!(
                "{} does not declare query scopes",
                self.name
            )));
        }
        symbols
            .iter()
            .map(|s| self.encode_code(&AttributeValue::from(s.as_ref())))
            .collect()
    }

    /// Whether a persisted code is the given member.
    ///
    /// Only available for attributes declared with `predicates`.
    pub fn predicate(&self, member: &str, code: i32) -> AppResult<bool> {
        if !self.predicates || self.multiple {
            return Err(AppError::validation(format!(
                "{} does not declare predicates",
                self.name
            )));
        }
        let wanted = self
            .find_value(member)
            .ok_or_else(|| AppError::invalid_member(self.name, member))?;
        Ok(wanted.code == code)
    }
}

/// Immutable table of enumerated attribute declarations.
#[derive(Debug, Clone)]
pub struct AttributeRegistry {
    attributes: Vec<EnumAttribute>,
}

/// Collects declarations and validates them into an [`AttributeRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    decls: Vec<AttributeDecl>,
}

impl RegistryBuilder {
    pub fn declare(mut self, decl: AttributeDecl) -> Self {
        self.decls.push(decl);
        self
    }

    pub fn build(self) -> AppResult<AttributeRegistry> {
        let mut names = HashSet::new();
        let mut attributes = Vec::with_capacity(self.decls.len());
        for decl in self.decls {
            if !names.insert(decl.name) {
                return Err(AppError::InvalidDeclaration(format!(
                    "{} declared twice",
                    decl.name
                )));
            }
            attributes.push(decl.build()?);
        }
        Ok(AttributeRegistry { attributes })
    }
}

impl AttributeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look up a declared attribute.
    pub fn attribute(&self, name: &str) -> AppResult<&EnumAttribute> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| AppError::UnknownAttribute(name.to_string()))
    }

    /// All declared attributes, in declaration order.
    pub fn attributes(&self) -> &[EnumAttribute] {
        &self.attributes
    }

    pub fn encode(&self, attribute: &str, value: &AttributeValue) -> AppResult<Persisted> {
        self.attribute(attribute)?.encode(value)
    }

    pub fn decode(&self, attribute: &str, persisted: &Persisted) -> AppResult<Symbolic> {
        self.attribute(attribute)?.decode(persisted)
    }

    pub fn values(&self, attribute: &str) -> AppResult<Vec<&'static str>> {
        Ok(self.attribute(attribute)?.values())
    }

    pub fn find_value(&self, attribute: &str, symbol: &str) -> AppResult<Member> {
        let attr = self.attribute(attribute)?;
        attr.find_value(symbol)
            .ok_or_else(|| AppError::invalid_member(attr.name, symbol))
    }

    /// Encode `value`, or fall back to the attribute's declared default
    /// when the caller supplied none.
    pub fn encode_or_default(
        &self,
        attribute: &str,
        value: Option<&AttributeValue>,
    ) -> AppResult<Persisted> {
        let attr = self.attribute(attribute)?;
        match value {
            Some(value) => attr.encode(value),
            None => attr.default_persisted().ok_or_else(|| {
                AppError::validation(format!("{} {}", attr.name, crate::config::BLANK_MESSAGE))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AttributeRegistry {
        AttributeRegistry::builder()
            .declare(
                declare("role", &["admin", "manager", "employee", "intern"], Representation::Positional)
                    .default("employee")
                    .predicates(),
            )
            .declare(
                declare(
                    "status",
                    &["active", "inactive", "suspended"],
                    Representation::Explicit(vec![0, 1, 3]),
                )
                .default("active")
                .scope(),
            )
            .declare(declare("hobbies", &["reading", "sports", "travel"], Representation::Positional).multiple())
            .build()
            .unwrap()
    }

    #[test]
    fn test_explicit_codes_round_trip() {
        let registry = registry();
        for symbol in ["active", "inactive", "suspended"] {
            let persisted = registry.encode("status", &symbol.into()).unwrap();
            let decoded = registry.decode("status", &persisted).unwrap();
            assert_eq!(decoded, Symbolic::One(symbol));
        }
    }

    #[test]
    fn test_explicit_codes_keep_gap() {
        let registry = registry();
        assert_eq!(registry.encode("status", &"inactive".into()).unwrap(), Persisted::Code(1));
        assert_eq!(registry.encode("status", &"suspended".into()).unwrap(), Persisted::Code(3));
        assert!(matches!(
            registry.decode("status", &Persisted::Code(2)),
            Err(AppError::UnknownCode { .. })
        ));
    }

    #[test]
    fn test_positional_codes_follow_order() {
        let registry = registry();
        assert_eq!(registry.values("role").unwrap(), vec!["admin", "manager", "employee", "intern"]);
        assert_eq!(registry.find_value("role", "admin").unwrap().code, 0);
        assert_eq!(registry.find_value("role", "intern").unwrap().code, 3);
    }

    #[test]
    fn test_encode_accepts_code_and_is_idempotent() {
        let registry = registry();
        assert_eq!(registry.encode("status", &1.into()).unwrap(), Persisted::Code(1));

        let persisted = Persisted::Code(3);
        let decoded = registry.decode("status", &persisted).unwrap();
        assert_eq!(registry.encode("status", &decoded.into()).unwrap(), persisted);
    }

    #[test]
    fn test_encode_rejects_unknown_member_and_code() {
        let registry = registry();
        let err = registry.encode("status", &"archived".into()).unwrap_err();
        assert!(matches!(err, AppError::InvalidMember { ref value, .. } if value == "archived"));

        let err = registry.encode("status", &2.into()).unwrap_err();
        assert!(matches!(err, AppError::InvalidMember { .. }));
    }

    #[test]
    fn test_single_attribute_rejects_list() {
        let registry = registry();
        let err = registry.encode("role", &vec!["admin"].into()).unwrap_err();
        assert!(matches!(err, AppError::InvalidMember { .. }));
    }

    #[test]
    fn test_multiple_attribute_encodes_subset() {
        let registry = registry();
        let persisted = registry
            .encode("hobbies", &vec!["travel", "reading", "travel"].into())
            .unwrap();
        assert_eq!(persisted, Persisted::List(vec!["travel".into(), "reading".into()]));

        let err = registry.encode("hobbies", &vec!["reading", "knitting"].into()).unwrap_err();
        assert!(matches!(err, AppError::InvalidMember { ref value, .. } if value == "knitting"));

        assert!(registry.encode("hobbies", &0.into()).is_err());
    }

    #[test]
    fn test_multiple_attribute_decodes_list() {
        let registry = registry();
        let decoded = registry
            .decode("hobbies", &Persisted::List(vec!["sports".into()]))
            .unwrap();
        assert_eq!(decoded, Symbolic::Many(vec!["sports"]));

        assert!(matches!(
            registry.decode("hobbies", &Persisted::List(vec!["knitting".into()])),
            Err(AppError::UnknownCode { .. })
        ));
    }

    #[test]
    fn test_defaults() {
        let registry = registry();
        assert_eq!(registry.encode_or_default("role", None).unwrap(), Persisted::Code(2));
        assert_eq!(registry.encode_or_default("status", None).unwrap(), Persisted::Code(0));
        assert_eq!(registry.encode_or_default("hobbies", None).unwrap(), Persisted::List(vec![]));
    }

    #[test]
    fn test_scope_codes_only_for_scoped_attribute() {
        let registry = registry();
        let status = registry.attribute("status").unwrap();
        assert_eq!(status.scope_codes(&["inactive", "suspended"]).unwrap(), vec![1, 3]);

        let role = registry.attribute("role").unwrap();
        assert!(role.scope_codes(&["admin"]).is_err());
    }

    #[test]
    fn test_predicates_only_for_predicate_attribute() {
        let registry = registry();
        let role = registry.attribute("role").unwrap();
        assert!(role.predicate("admin", 0).unwrap());
        assert!(!role.predicate("manager", 0).unwrap());
        assert!(role.predicate("owner", 0).is_err());

        let status = registry.attribute("status").unwrap();
        assert!(status.predicate("active", 0).is_err());
    }

    #[test]
    fn test_unknown_attribute() {
        let registry = registry();
        assert!(matches!(
            registry.encode("mood", &"happy".into()),
            Err(AppError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_invalid_declarations_rejected() {
        let dup_code = AttributeRegistry::builder()
            .declare(declare("s", &["a", "b"], Representation::Explicit(vec![1, 1])))
            .build();
        assert!(matches!(dup_code, Err(AppError::InvalidDeclaration(_))));

        let short = AttributeRegistry::builder()
            .declare(declare("s", &["a", "b"], Representation::Explicit(vec![1])))
            .build();
        assert!(short.is_err());

        let bad_default = AttributeRegistry::builder()
            .declare(declare("s", &["a"], Representation::Positional).default("z"))
            .build();
        assert!(bad_default.is_err());

        let twice = AttributeRegistry::builder()
            .declare(declare("s", &["a"], Representation::Positional))
            .declare(declare("s", &["b"], Representation::Positional))
            .build();
        assert!(twice.is_err());
    }

    #[test]
    fn test_attribute_value_deserializes_untagged() {
        let code: AttributeValue = serde_json::from_str("1").unwrap();
        let symbol: AttributeValue = serde_json::from_str("\"inactive\"").unwrap();
        let list: AttributeValue = serde_json::from_str("[\"reading\", \"travel\"]").unwrap();

        assert_eq!(code, AttributeValue::Code(1));
        assert_eq!(symbol, AttributeValue::Symbol("inactive".into()));
        assert_eq!(list, AttributeValue::from(vec!["reading", "travel"]));
    }
}
