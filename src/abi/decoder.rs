//! Composite decoding and the endpoint-level entry points.

use std::io::Read;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

use super::schema::Endpoint;
use super::types::{LeafType, TypeExpr, VARIADIC};
use super::{AbiSchema, DecodedValue, Error, HexCursor, ResultExt, StructValue, scalar};

/// Decodes VM view outputs against a loaded contract ABI.
///
/// The ABI is read once through [`load_abi`](Self::load_abi) and only read afterwards, so a
/// loaded decoder can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct VmOutputDecoder {
    abi: Option<AbiSchema>,
}

impl VmOutputDecoder {
    /// Creates a decoder without an ABI. Every decode fails until one is loaded.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_abi(abi: AbiSchema) -> Self {
        Self { abi: Some(abi) }
    }

    /// Reads the ABI JSON document.
    pub fn load_abi<R: Read>(&mut self, reader: R) -> Result<(), Error> {
        let abi = AbiSchema::from_reader(reader)?;
        log::debug!(
            "Loaded ABI `{}` with {} endpoints and {} types",
            abi.name,
            abi.endpoints.len(),
            abi.types.len()
        );
        self.abi = Some(abi);
        Ok(())
    }

    pub fn abi(&self) -> Result<&AbiSchema, Error> {
        self.abi.as_ref().ok_or(Error::AbiNotLoaded)
    }

    /// Decodes hex payloads returned for `endpoint`.
    ///
    /// A single payload decodes to a single value. Several payloads decode to a list, payload `i`
    /// using output `i` when the endpoint declares several outputs, and the only output
    /// otherwise. Each `variadic<T>` value arrives as its own payload.
    pub fn decode_hex<S: AsRef<str>>(
        &self,
        endpoint: &str,
        payloads: &[S],
    ) -> Result<DecodedValue, Error> {
        let abi = self.abi()?;
        let definition = abi.endpoint(endpoint)?;
        if definition.outputs.is_empty() {
            return Err(Error::EndpointWithoutOutputs(endpoint.to_string()));
        }
        log::debug!(
            "Decoding {} payload(s) for endpoint `{endpoint}`",
            payloads.len()
        );

        let decoded = match payloads {
            [payload] => decode_type(Some(abi), &definition.outputs[0].ty, payload.as_ref()),
            _ => payloads
                .iter()
                .enumerate()
                .map(|(index, payload)| {
                    let ty = output_for_payload(definition, index)?;
                    decode_type(Some(abi), ty, payload.as_ref())
                        .context(|| format!("payload #{index}"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(DecodedValue::List),
        };
        decoded.context(|| format!("endpoint `{endpoint}`"))
    }

    /// Decodes base64 payloads, as returned by the VM query API, for `endpoint`.
    pub fn decode_query<S: AsRef<str>>(
        &self,
        endpoint: &str,
        payloads: &[S],
    ) -> Result<DecodedValue, Error> {
        let hex_payloads = payloads
            .iter()
            .map(|payload| {
                BASE64
                    .decode(payload.as_ref())
                    .map(hex::encode)
                    .map_err(|e| Error::InvalidBase64(format!("`{}`: {e}", payload.as_ref())))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.decode_hex(endpoint, &hex_payloads)
    }

    /// Decodes a single hex payload against an arbitrary type string.
    pub fn decode_type(&self, ty: &str, hex: &str) -> Result<DecodedValue, Error> {
        decode_type(self.abi.as_ref(), ty, hex)
    }
}

fn output_for_payload(endpoint: &Endpoint, index: usize) -> Result<&str, Error> {
    let outputs = &endpoint.outputs;
    if outputs.len() == 1 {
        return Ok(&outputs[0].ty);
    }
    if let Some(output) = outputs.get(index) {
        return Ok(&output.ty);
    }
    match outputs.last() {
        Some(last) if last.ty.trim_start().starts_with(VARIADIC) => Ok(&last.ty),
        _ => Err(Error::UnexpectedPayload {
            endpoint: endpoint.name.clone(),
            index,
        }),
    }
}

/// Decodes `hex` as a top-level value of type `ty`. Named struct types are resolved
/// through `abi`.
pub fn decode_type(abi: Option<&AbiSchema>, ty: &str, hex: &str) -> Result<DecodedValue, Error> {
    let expr = TypeExpr::parse(ty)?;
    let mut cursor = HexCursor::new(hex)?;
    let value = Decoder { abi }
        .decode(&mut cursor, &expr, None, true)
        .context(|| format!("type `{ty}`"))?;
    if !cursor.is_empty() {
        log::debug!(
            "{} trailing hex chars left after decoding `{ty}`",
            cursor.remaining_len()
        );
    }
    Ok(value)
}

struct Decoder<'a> {
    abi: Option<&'a AbiSchema>,
}

impl Decoder<'_> {
    /// `len` is the element count for lists and the byte length for dynamic leaves.
    /// `top_level` is set only when the value owns the whole payload.
    fn decode(
        &self,
        cursor: &mut HexCursor<'_>,
        ty: &TypeExpr,
        len: Option<usize>,
        top_level: bool,
    ) -> Result<DecodedValue, Error> {
        log::trace!("Decoding `{ty}` at offset {}", cursor.position());
        match ty {
            TypeExpr::List(inner) => self.decode_list(cursor, inner, len),
            TypeExpr::Option(inner) => self.decode_option(cursor, inner),
            TypeExpr::Tuple(items) => self.decode_tuple(cursor, items),
            // One value per call; repetitions arrive as separate payloads.
            TypeExpr::Variadic(inner) => self.decode(cursor, inner, None, top_level),
            TypeExpr::Leaf(LeafType::Struct(name)) => self.decode_struct(cursor, name),
            TypeExpr::Leaf(leaf) => scalar::decode_scalar(cursor, leaf, len, top_level),
        }
    }

    /// Decodes a value embedded in a larger one, reading the prefix its type carries.
    fn decode_nested(
        &self,
        cursor: &mut HexCursor<'_>,
        ty: &TypeExpr,
    ) -> Result<DecodedValue, Error> {
        if ty.is_list() || ty.is_dynamic_leaf() {
            let len = cursor.read_prefix()?;
            self.decode(cursor, ty, Some(len), false)
        } else {
            self.decode(cursor, ty, None, false)
        }
    }

    /// Without a count the list runs to the end of the input.
    fn decode_list(
        &self,
        cursor: &mut HexCursor<'_>,
        inner: &TypeExpr,
        count: Option<usize>,
    ) -> Result<DecodedValue, Error> {
        let mut items = Vec::new();
        let mut index = 0;
        loop {
            match count {
                Some(count) if index == count => break,
                None if cursor.is_empty() => break,
                _ => {}
            }
            let start = cursor.position();
            let item = self
                .decode_nested(cursor, inner)
                .context(|| format!("element #{index} of List<{inner}>"))?;
            if count.is_none() && cursor.position() == start {
                return Err(Error::InvalidValue(format!(
                    "List<{inner}> element #{index} consumed no data"
                )));
            }
            items.push(item);
            index += 1;
        }
        Ok(DecodedValue::List(items))
    }

    fn decode_option(
        &self,
        cursor: &mut HexCursor<'_>,
        inner: &TypeExpr,
    ) -> Result<DecodedValue, Error> {
        if cursor.is_empty() {
            return Ok(DecodedValue::absent());
        }
        if cursor.take(2)? == "00" {
            return Ok(DecodedValue::absent());
        }
        let value = self
            .decode_nested(cursor, inner)
            .context(|| format!("Option<{inner}>"))?;
        Ok(DecodedValue::Option(Some(Box::new(value))))
    }

    fn decode_tuple(
        &self,
        cursor: &mut HexCursor<'_>,
        items: &[TypeExpr],
    ) -> Result<DecodedValue, Error> {
        items
            .iter()
            .enumerate()
            .map(|(index, ty)| {
                self.decode_nested(cursor, ty)
                    .context(|| format!("tuple element #{index} `{ty}`"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(DecodedValue::List)
    }

    fn decode_struct(
        &self,
        cursor: &mut HexCursor<'_>,
        name: &str,
    ) -> Result<DecodedValue, Error> {
        let abi = self
            .abi
            .ok_or_else(|| Error::TypeNotFound(name.to_string()))?;
        let mut value = StructValue::new(name);
        for field in abi.struct_fields(name)? {
            let context = || format!("field `{}` of `{name}`", field.name);
            let ty = TypeExpr::parse(&field.ty).context(context)?;
            let decoded = self.decode_nested(cursor, &ty).context(context)?;
            value.push(field.name.as_str(), decoded);
        }
        Ok(DecodedValue::Struct(value))
    }
}
