//! Computation graph builders.
//!
//! Earth Engine evaluates server-side expressions sent as a graph of value
//! nodes:
//!
//! ```json
//! { "result": "1", "values": { "0": {...}, "1": { "functionInvocationValue": {...} } } }
//! ```
//!
//! Nodes are inlined where the format allows it. Function bodies must be
//! value references, so each `Expr::Function` body is hoisted into `values`.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

/// Argument name the service expects for the element of a mapped collection.
pub const MAPPING_VAR: &str = "_MAPPING_VAR_0_0";

/// A node in the computation graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(Value),
    Invocation {
        function: String,
        arguments: BTreeMap<String, Expr>,
    },
    /// Reference to an argument of the enclosing function definition.
    Argument(String),
    Function {
        argument_names: Vec<String>,
        body: Box<Expr>,
    },
}

impl Expr {
    pub fn constant(value: impl Into<Value>) -> Self {
        Expr::Constant(value.into())
    }

    pub fn call<'a>(function: &str, arguments: impl IntoIterator<Item = (&'a str, Expr)>) -> Self {
        Expr::Invocation {
            function: function.to_string(),
            arguments: arguments
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    /// Serialize into the REST `Expression` message.
    pub fn to_expression(&self) -> Value {
        let mut encoder = Encoder::default();
        let root = encoder.encode(self);
        let result = encoder.push(root);
        json!({ "result": result, "values": encoder.values })
    }
}

#[derive(Default)]
struct Encoder {
    values: Map<String, Value>,
}

impl Encoder {
    fn push(&mut self, node: Value) -> String {
        let key = self.values.len().to_string();
        self.values.insert(key.clone(), node);
        key
    }

    fn encode(&mut self, expr: &Expr) -> Value {
        match expr {
            Expr::Constant(value) => json!({ "constantValue": value }),
            Expr::Invocation {
                function,
                arguments,
            } => {
                let mut encoded = Map::new();
                for (name, value) in arguments {
                    encoded.insert(name.clone(), self.encode(value));
                }
                json!({
                    "functionInvocationValue": {
                        "functionName": function,
                        "arguments": encoded,
                    }
                })
            }
            Expr::Argument(name) => json!({ "argumentReference": name }),
            Expr::Function {
                argument_names,
                body,
            } => {
                let body = self.encode(body);
                let key = self.push(body);
                json!({
                    "functionDefinitionValue": {
                        "argumentNames": argument_names,
                        "body": key,
                    }
                })
            }
        }
    }
}

/// Server-side geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry(pub Expr);

impl Geometry {
    /// Planar rectangle from two opposite corners `[x1, y1, x2, y2]`.
    pub fn rectangle(corners: [f64; 4]) -> Self {
        let [x1, y1, x2, y2] = corners;
        Geometry(Expr::call(
            "GeometryConstructors.Rectangle",
            [
                ("coordinates", Expr::constant(json!([[x1, y1], [x2, y2]]))),
                ("geodesic", Expr::constant(false)),
            ],
        ))
    }
}

/// Server-side collection filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter(pub Expr);

impl Filter {
    /// Scenes whose `system:time_start` falls in `[start, end)`.
    pub fn date(start: &str, end: &str) -> Self {
        let range = Expr::call(
            "DateRange",
            [("start", Expr::constant(start)), ("end", Expr::constant(end))],
        );
        Filter(Expr::call(
            "Filter.dateRangeContains",
            [
                ("leftValue", range),
                ("rightField", Expr::constant("system:time_start")),
            ],
        ))
    }

    /// Scenes whose footprint intersects `geometry`.
    pub fn bounds(geometry: &Geometry) -> Self {
        Filter(Expr::call(
            "Filter.intersects",
            [
                ("leftField", Expr::constant(".all")),
                ("rightValue", geometry.0.clone()),
            ],
        ))
    }

    /// Scenes whose metadata property is strictly below `value`.
    pub fn lt(property: &str, value: f64) -> Self {
        Filter(Expr::call(
            "Filter.lessThan",
            [
                ("leftField", Expr::constant(property)),
                ("rightValue", Expr::constant(value)),
            ],
        ))
    }
}

/// Server-side image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image(pub Expr);

impl Image {
    pub fn constant(value: impl Into<Value>) -> Self {
        Image(Expr::call("Image.constant", [("value", Expr::constant(value))]))
    }

    /// The element bound inside a [`ImageCollection::map`] body.
    pub fn mapping_var() -> Self {
        Image(Expr::Argument(MAPPING_VAR.to_string()))
    }

    pub fn select<S: AsRef<str>>(&self, bands: &[S]) -> Self {
        let names: Vec<&str> = bands.iter().map(AsRef::as_ref).collect();
        Image(Expr::call(
            "Image.select",
            [
                ("input", self.0.clone()),
                ("bandSelectors", Expr::constant(json!(names))),
            ],
        ))
    }

    pub fn clip(&self, geometry: &Geometry) -> Self {
        Image(Expr::call(
            "Image.clip",
            [("input", self.0.clone()), ("geometry", geometry.0.clone())],
        ))
    }

    fn binary(&self, function: &str, other: &Image) -> Self {
        Image(Expr::call(
            function,
            [("image1", self.0.clone()), ("image2", other.0.clone())],
        ))
    }

    pub fn bitwise_and(&self, mask: i64) -> Self {
        self.binary("Image.bitwiseAnd", &Image::constant(mask))
    }

    pub fn equals(&self, value: i64) -> Self {
        self.binary("Image.eq", &Image::constant(value))
    }

    pub fn and(&self, other: &Image) -> Self {
        self.binary("Image.and", other)
    }

    pub fn divide(&self, value: f64) -> Self {
        self.binary("Image.divide", &Image::constant(value))
    }

    pub fn update_mask(&self, mask: &Image) -> Self {
        Image(Expr::call(
            "Image.updateMask",
            [("image", self.0.clone()), ("mask", mask.0.clone())],
        ))
    }

    /// Resample to `scale` meters per pixel in `crs`.
    pub fn reproject(&self, crs: &str, scale: f64) -> Self {
        let projection = Expr::call("Projection", [("crs", Expr::constant(crs))]);
        Image(Expr::call(
            "Image.reproject",
            [
                ("image", self.0.clone()),
                ("crs", projection),
                ("scale", Expr::constant(scale)),
            ],
        ))
    }
}

/// Server-side image collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCollection(pub Expr);

impl ImageCollection {
    pub fn load(id: &str) -> Self {
        ImageCollection(Expr::call("ImageCollection.load", [("id", Expr::constant(id))]))
    }

    pub fn filter(&self, filter: Filter) -> Self {
        ImageCollection(Expr::call(
            "Collection.filter",
            [("collection", self.0.clone()), ("filter", filter.0)],
        ))
    }

    pub fn filter_date(&self, start: &str, end: &str) -> Self {
        self.filter(Filter::date(start, end))
    }

    pub fn filter_bounds(&self, geometry: &Geometry) -> Self {
        self.filter(Filter::bounds(geometry))
    }

    /// Apply `f` to every image; `f` receives [`Image::mapping_var`].
    pub fn map(&self, f: impl FnOnce(Image) -> Image) -> Self {
        let body = f(Image::mapping_var());
        let function = Expr::Function {
            argument_names: vec![MAPPING_VAR.to_string()],
            body: Box::new(body.0),
        };
        ImageCollection(Expr::call(
            "Collection.map",
            [("collection", self.0.clone()), ("baseAlgorithm", function)],
        ))
    }

    /// Per-pixel, per-band median across the collection.
    ///
    /// Band names are kept as is, unlike `ImageCollection.reduce` which
    /// suffixes them with `_median`.
    pub fn median(&self) -> Image {
        Image(Expr::call(
            "ImageCollection.median",
            [("collection", self.0.clone())],
        ))
    }
}
