use std::fmt;

use super::Error;

pub const LIST: &str = "List";
pub const OPTION: &str = "Option";
pub const TUPLE: &str = "tuple";
pub const VARIADIC: &str = "variadic";

/// Byte width of the length and count prefixes used by nested encodings.
pub const PREFIX_BYTES: usize = 4;

/// Splits an ABI type into its outermost wrapper and the wrapped type string.
///
/// `List<Option<u8>>` splits into `("List", "Option<u8>")`; a plain name such as `u64`
/// yields an empty wrapper. The wrapper must close at the very end of the string.
pub fn split_types(full: &str) -> Result<(&str, &str), Error> {
    let full = full.trim();
    let Some(open) = full.find('<') else {
        if full.contains('>') {
            return Err(Error::MalformedType(full.to_string()));
        }
        return Ok(("", full));
    };
    if open == 0 {
        return Err(Error::MalformedType(full.to_string()));
    }

    let mut depth = 0usize;
    for (i, c) in full.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::MalformedType(full.to_string()))?;
                if depth == 0 && i != full.len() - 1 {
                    return Err(Error::MalformedType(full.to_string()));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Error::MalformedType(full.to_string()));
    }

    Ok((full[..open].trim(), &full[open + 1..full.len() - 1]))
}

/// Splits the argument list of a `tuple<...>` on commas that are not nested in brackets.
pub fn split_tuple_types(inner: &str) -> Result<Vec<&str>, Error> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::MalformedType(inner.to_string()))?;
            }
            ',' if depth == 0 => {
                parts.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Error::MalformedType(inner.to_string()));
    }
    parts.push(inner[start..].trim());

    Ok(parts)
}

/// Primitive or named leaf of an ABI type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    BigInt,
    BigUint,
    BigFloat,
    Bool,
    Address,
    /// Byte buffers and strings (`ManagedBuffer`, `TokenIdentifier`, `String`, ...).
    Buffer,
    /// A type that must be resolved through the ABI `types` section.
    Struct(String),
}

impl LeafType {
    /// Resolves a leaf type name. Names that are not primitives are treated as struct references.
    pub fn from_name(name: &str) -> Self {
        match name {
            "i8" => LeafType::I8,
            "i16" => LeafType::I16,
            "i32" | "isize" => LeafType::I32,
            "i64" => LeafType::I64,
            "u8" => LeafType::U8,
            "u16" => LeafType::U16,
            "u32" | "usize" => LeafType::U32,
            "u64" => LeafType::U64,
            "BigInt" => LeafType::BigInt,
            "BigUint" => LeafType::BigUint,
            "BigFloat" => LeafType::BigFloat,
            "bool" => LeafType::Bool,
            "Address" => LeafType::Address,
            "ManagedBuffer" | "TokenIdentifier" | "bytes" | "BoxedBytes" | "String" | "&str"
            | "Vec<u8>" | "&[u8]" => LeafType::Buffer,
            other => LeafType::Struct(other.to_string()),
        }
    }

    /// Byte width of fixed-size integers.
    pub fn int_width(&self) -> Option<usize> {
        match self {
            LeafType::I8 | LeafType::U8 => Some(1),
            LeafType::I16 | LeafType::U16 => Some(2),
            LeafType::I32 | LeafType::U32 => Some(4),
            LeafType::I64 | LeafType::U64 => Some(8),
            _ => None,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            LeafType::I8 | LeafType::I16 | LeafType::I32 | LeafType::I64 | LeafType::BigInt
        )
    }

    /// Whether the leaf carries a 4-byte length prefix when nested.
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            LeafType::Buffer | LeafType::BigInt | LeafType::BigUint | LeafType::BigFloat
        )
    }
}

impl fmt::Display for LeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeafType::I8 => "i8",
            LeafType::I16 => "i16",
            LeafType::I32 => "i32",
            LeafType::I64 => "i64",
            LeafType::U8 => "u8",
            LeafType::U16 => "u16",
            LeafType::U32 => "u32",
            LeafType::U64 => "u64",
            LeafType::BigInt => "BigInt",
            LeafType::BigUint => "BigUint",
            LeafType::BigFloat => "BigFloat",
            LeafType::Bool => "bool",
            LeafType::Address => "Address",
            LeafType::Buffer => "ManagedBuffer",
            LeafType::Struct(name) => name,
        };
        f.write_str(name)
    }
}

/// Parsed ABI type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    List(Box<TypeExpr>),
    Option(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Variadic(Box<TypeExpr>),
    Leaf(LeafType),
}

impl TypeExpr {
    /// Parses an ABI type string such as `Option<tuple<i32,List<Address>>>`.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::MalformedType(raw.to_string()));
        }
        // Byte-slice leaves use the same angle brackets as wrappers.
        if matches!(raw, "Vec<u8>" | "&[u8]") {
            return Ok(TypeExpr::Leaf(LeafType::Buffer));
        }

        let (wrapper, inner) = split_types(raw)?;
        match wrapper {
            "" => Ok(TypeExpr::Leaf(LeafType::from_name(inner))),
            LIST => Ok(TypeExpr::List(Box::new(Self::parse(inner)?))),
            OPTION => Ok(TypeExpr::Option(Box::new(Self::parse(inner)?))),
            VARIADIC => Ok(TypeExpr::Variadic(Box::new(Self::parse(inner)?))),
            TUPLE => split_tuple_types(inner)?
                .into_iter()
                .map(Self::parse)
                .collect::<Result<Vec<_>, _>>()
                .map(TypeExpr::Tuple),
            _ => Err(Error::UnsupportedType(raw.to_string())),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TypeExpr::List(_))
    }

    /// Whether a nested value of this type is preceded by a byte-length prefix.
    pub fn is_dynamic_leaf(&self) -> bool {
        matches!(self, TypeExpr::Leaf(leaf) if leaf.is_dynamic())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::List(inner) => write!(f, "{LIST}<{inner}>"),
            TypeExpr::Option(inner) => write!(f, "{OPTION}<{inner}>"),
            TypeExpr::Variadic(inner) => write!(f, "{VARIADIC}<{inner}>"),
            TypeExpr::Tuple(items) => {
                write!(f, "{TUPLE}<")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(">")
            }
            TypeExpr::Leaf(leaf) => write!(f, "{leaf}"),
        }
    }
}

impl std::str::FromStr for TypeExpr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
