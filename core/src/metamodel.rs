//! Metamodel vocabulary
//!
//! Every AST fragment carries a `$class` discriminator such as
//! `concerto.metamodel@1.0.0.StringProperty`. Only the segment after the last
//! `.` selects the variant; the namespace prefix is informational.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Namespace of the metamodel the AST vocabulary is drawn from
pub const METAMODEL_NAMESPACE: &str = "concerto.metamodel@1.0.0";

/// Build a fully qualified metamodel `$class` value
#[must_use]
pub fn metamodel_class(short_name: &str) -> String {
    format!("{METAMODEL_NAMESPACE}.{short_name}")
}

/// Strip the namespace prefix from a `$class` value
#[must_use]
pub fn short_class_name(class: &str) -> &str {
    class.rsplit_once('.').map_or(class, |(_, short)| short)
}

/// Primitive kinds a property or scalar can be typed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// UTF-8 text
    String,
    /// `true` / `false`
    Boolean,
    /// RFC 3339 timestamp
    DateTime,
    /// 64-bit float
    Double,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
}

impl PrimitiveType {
    /// All primitive kinds
    pub const ALL: [Self; 6] = [
        Self::String,
        Self::Boolean,
        Self::DateTime,
        Self::Double,
        Self::Integer,
        Self::Long,
    ];

    /// Canonical name as it appears in model files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::DateTime => "DateTime",
            Self::Double => "Double",
            Self::Integer => "Integer",
            Self::Long => "Long",
        }
    }

    /// Whether number range validators apply to this kind
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Double | Self::Integer | Self::Long)
    }

    /// Whether values of this kind must be integral
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Integer | Self::Long)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(())
    }
}

/// Property discriminators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyClass {
    /// Field typed with a primitive kind
    Primitive(PrimitiveType),
    /// Field typed with a named declaration
    Object,
    /// Reference to an identified class
    Relationship,
    /// Enumeration value
    Enum,
}

impl PropertyClass {
    /// Select the property variant from a `$class` value
    #[must_use]
    pub fn parse(class: &str) -> Option<Self> {
        let class = match short_class_name(class) {
            "StringProperty" => Self::Primitive(PrimitiveType::String),
            "BooleanProperty" => Self::Primitive(PrimitiveType::Boolean),
            "DateTimeProperty" => Self::Primitive(PrimitiveType::DateTime),
            "DoubleProperty" => Self::Primitive(PrimitiveType::Double),
            "IntegerProperty" => Self::Primitive(PrimitiveType::Integer),
            "LongProperty" => Self::Primitive(PrimitiveType::Long),
            "ObjectProperty" => Self::Object,
            "RelationshipProperty" => Self::Relationship,
            "EnumProperty" => Self::Enum,
            _ => return None,
        };
        Some(class)
    }
}

/// Flavours of class declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    /// Plain structured type
    Concept,
    /// Identified business object
    Asset,
    /// Identified actor
    Participant,
    /// Submitted operation
    Transaction,
    /// Emitted notification
    Event,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Concept => "Concept",
            Self::Asset => "Asset",
            Self::Participant => "Participant",
            Self::Transaction => "Transaction",
            Self::Event => "Event",
        };
        f.write_str(name)
    }
}

/// Declaration discriminators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationClass {
    /// Class with properties
    Class(ClassKind),
    /// Enumeration
    Enum,
    /// Named alias of a primitive kind
    Scalar(PrimitiveType),
}

impl DeclarationClass {
    /// Select the declaration variant from a `$class` value
    #[must_use]
    pub fn parse(class: &str) -> Option<Self> {
        let class = match short_class_name(class) {
            "ConceptDeclaration" => Self::Class(ClassKind::Concept),
            "AssetDeclaration" => Self::Class(ClassKind::Asset),
            "ParticipantDeclaration" => Self::Class(ClassKind::Participant),
            "TransactionDeclaration" => Self::Class(ClassKind::Transaction),
            "EventDeclaration" => Self::Class(ClassKind::Event),
            "EnumDeclaration" => Self::Enum,
            "StringScalar" => Self::Scalar(PrimitiveType::String),
            "BooleanScalar" => Self::Scalar(PrimitiveType::Boolean),
            "DateTimeScalar" => Self::Scalar(PrimitiveType::DateTime),
            "DoubleScalar" => Self::Scalar(PrimitiveType::Double),
            "IntegerScalar" => Self::Scalar(PrimitiveType::Integer),
            "LongScalar" => Self::Scalar(PrimitiveType::Long),
            _ => return None,
        };
        Some(class)
    }
}

/// Import discriminators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportClass {
    /// Import a single named type
    Type,
    /// Import a list of named types
    Types,
    /// Wildcard import of a whole namespace
    All,
}

impl ImportClass {
    /// Select the import variant from a `$class` value
    #[must_use]
    pub fn parse(class: &str) -> Option<Self> {
        match short_class_name(class) {
            "ImportType" => Some(Self::Type),
            "ImportTypes" => Some(Self::Types),
            "ImportAll" => Some(Self::All),
            _ => None,
        }
    }
}

/// Validator discriminators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorClass {
    /// Regular expression over string values
    StringRegex,
    /// Numeric range, with the numeric kind it was declared for
    Domain(PrimitiveType),
    /// Length range over string values
    StringLength,
}

impl ValidatorClass {
    /// Select the validator variant from a `$class` value
    #[must_use]
    pub fn parse(class: &str) -> Option<Self> {
        match short_class_name(class) {
            "StringRegexValidator" => Some(Self::StringRegex),
            "DoubleDomainValidator" => Some(Self::Domain(PrimitiveType::Double)),
            "IntegerDomainValidator" => Some(Self::Domain(PrimitiveType::Integer)),
            "LongDomainValidator" => Some(Self::Domain(PrimitiveType::Long)),
            "StringLengthValidator" => Some(Self::StringLength),
            _ => None,
        }
    }
}
