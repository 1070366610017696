use crate::error::Error;
use crate::model::CatalogEntry;
use serde_json::{Map, Value};

/// Brand propagated down the document tree while walking nested groups.
#[derive(Debug, Clone, Default)]
pub struct BrandContext {
    pub brand: Option<String>,
}

impl BrandContext {
    fn with_brand(&self, brand: Option<String>) -> BrandContext {
        match brand {
            Some(b) if !b.is_empty() => BrandContext { brand: Some(b) },
            _ => self.clone(),
        }
    }
}

/// The catalog shapes observed across source hosts. Each node is classified
/// once, then dispatched — no duck-typed field probing.
enum Shape<'a> {
    /// `{"name": brand, "phones": [...]}`
    BrandGroup {
        name: Option<&'a Value>,
        phones: &'a Value,
    },
    /// `{"name": model, "file": id}`
    Item {
        name: &'a Value,
        file: Option<&'a Value>,
    },
    /// Flat object — scalar values are `{id: display_name}` pairs, array and
    /// object values are nested groups keyed by brand.
    FlatPairs(&'a Map<String, Value>),
    Array(&'a Vec<Value>),
    Scalar,
}

fn classify(node: &Value) -> Shape<'_> {
    match node {
        Value::Object(map) => {
            if let Some(phones) = map.get("phones") {
                Shape::BrandGroup {
                    name: map.get("name"),
                    phones,
                }
            } else if let Some(name) = map.get("name") {
                Shape::Item {
                    name,
                    file: map.get("file"),
                }
            } else {
                Shape::FlatPairs(map)
            }
        }
        Value::Array(items) => Shape::Array(items),
        _ => Shape::Scalar,
    }
}

/// Flatten an arbitrarily nested catalog document into canonical entries.
///
/// Depth-first and order-preserving; documents whose root is neither an
/// object nor an array are rejected as malformed. Entries whose display name
/// is empty after trimming are dropped rather than emitted.
pub fn normalize(document: &Value, source_id: &str) -> Result<Vec<CatalogEntry>, Error> {
    if !document.is_object() && !document.is_array() {
        return Err(Error::MalformedCatalog);
    }

    let mut entries = Vec::new();
    walk(document, &BrandContext::default(), source_id, &mut entries);
    Ok(entries)
}

fn walk(node: &Value, ctx: &BrandContext, source_id: &str, out: &mut Vec<CatalogEntry>) {
    match classify(node) {
        Shape::BrandGroup { name, phones } => {
            let ctx = ctx.with_brand(name.map(coerce_string));
            match phones {
                Value::Array(items) => {
                    for item in items {
                        walk_phone(item, &ctx, source_id, out);
                    }
                }
                other => walk(other, &ctx, source_id, out),
            }
        }
        Shape::Item { name, file } => {
            let model = coerce_string(name);
            // Hosts key raw data by the full display name when the item
            // carries no explicit file id.
            let fallback = join_display_name(ctx, &model);
            let measurement_id = file
                .map(first_file_id)
                .filter(|id| !id.is_empty())
                .unwrap_or(fallback);
            emit(ctx, source_id, model, measurement_id, out);
        }
        Shape::FlatPairs(map) => {
            for (key, value) in map {
                match value {
                    Value::Null => {}
                    Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                        // `{id: display_name}` pair — the key is the fetch id.
                        let display = coerce_string(value);
                        if !display.is_empty() {
                            out.push(CatalogEntry {
                                source_id: source_id.to_string(),
                                brand: None,
                                model: display.clone(),
                                display_name: display,
                                measurement_id: key.clone(),
                                category_hint: None,
                            });
                        }
                    }
                    nested => {
                        let ctx = ctx.with_brand(Some(key.trim().to_string()));
                        walk(nested, &ctx, source_id, out);
                    }
                }
            }
        }
        Shape::Array(items) => {
            for item in items {
                walk_phone(item, ctx, source_id, out);
            }
        }
        Shape::Scalar => {}
    }
}

/// An array element is either a nested node or a bare model name (the legacy
/// `{brand: [model, ...]}` shape lands here with the key as brand context).
fn walk_phone(node: &Value, ctx: &BrandContext, source_id: &str, out: &mut Vec<CatalogEntry>) {
    match node {
        Value::Object(_) | Value::Array(_) => walk(node, ctx, source_id, out),
        Value::Null => {}
        scalar => {
            let model = coerce_string(scalar);
            let measurement_id = model.clone();
            emit(ctx, source_id, model, measurement_id, out);
        }
    }
}

fn join_display_name(ctx: &BrandContext, model: &str) -> String {
    match &ctx.brand {
        Some(brand) => format!("{} {}", brand, model).trim().to_string(),
        None => model.to_string(),
    }
}

fn emit(
    ctx: &BrandContext,
    source_id: &str,
    model: String,
    measurement_id: String,
    out: &mut Vec<CatalogEntry>,
) {
    let display_name = join_display_name(ctx, &model);
    if display_name.is_empty() {
        return;
    }
    out.push(CatalogEntry {
        source_id: source_id.to_string(),
        brand: ctx.brand.clone(),
        model,
        display_name,
        measurement_id,
        category_hint: None,
    });
}

/// Names may arrive as numbers or booleans on sloppy hosts; coerce instead of
/// rejecting so one odd model does not sink the whole document.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// A `file` field holding a list names several captures of the same device;
/// the first element is the canonical representative.
fn first_file_id(value: &Value) -> String {
    match value {
        Value::Array(items) => items.first().map(coerce_string).unwrap_or_default(),
        other => coerce_string(other),
    }
}
