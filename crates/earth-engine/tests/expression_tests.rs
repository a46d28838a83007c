//! Tests for the serialized composite expressions.

use dataset_common::{square, Coordinate};
use earth_engine::{CollectionQuery, EarthEngineClient, ExportRequest};
use serde_json::Value;

/// Collect every `functionName` in the graph.
fn function_names(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(name)) = map.get("functionName") {
                out.push(name.clone());
            }
            for v in map.values() {
                function_names(v, out);
            }
        }
        Value::Array(items) => items.iter().for_each(|v| function_names(v, out)),
        _ => {}
    }
}

fn root_call(expression: &Value) -> &Value {
    let key = expression["result"].as_str().unwrap();
    &expression["values"][key]["functionInvocationValue"]
}

#[test]
fn test_sentinel2_composite_pipeline() {
    let region = square(Coordinate::new(-98.5, 38.5), 3.75);
    let image = CollectionQuery::sentinel2_true_color().composite(&region);
    let expression = image.0.to_expression();

    let root = root_call(&expression);
    assert_eq!(root["functionName"], "Image.select");
    assert_eq!(
        root["arguments"]["bandSelectors"]["constantValue"],
        serde_json::json!(["B4", "B3", "B2"])
    );

    let mut names = Vec::new();
    function_names(&expression, &mut names);
    for expected in [
        "ImageCollection.load",
        "Filter.dateRangeContains",
        "Filter.intersects",
        "Filter.lessThan",
        "Collection.map",
        "Image.updateMask",
        "Image.bitwiseAnd",
        "Image.divide",
        "ImageCollection.median",
        "Image.clip",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {}", expected);
    }
}

#[test]
fn test_sentinel2_date_window_and_threshold() {
    let region = square(Coordinate::new(-98.5, 38.5), 3.75);
    let json = CollectionQuery::sentinel2_true_color()
        .composite(&region)
        .0
        .to_expression()
        .to_string();

    assert!(json.contains("\"2018-01-01\""));
    assert!(json.contains("\"2018-06-30\""));
    assert!(json.contains("CLOUDY_PIXEL_PERCENTAGE"));
    assert!(json.contains("COPERNICUS/S2"));
    assert!(json.contains("QA60"));
}

#[test]
fn test_cdl_composite_has_no_cloud_steps() {
    let region = square(Coordinate::new(-98.5, 38.5), 3.75);
    let expression = CollectionQuery::cdl_cultivated().composite(&region).0.to_expression();

    let mut names = Vec::new();
    function_names(&expression, &mut names);
    assert!(!names.iter().any(|n| n == "Collection.map"));
    assert!(!names.iter().any(|n| n == "Filter.lessThan"));

    let json = expression.to_string();
    assert!(json.contains("USDA/NASS/CDL"));
    assert!(json.contains("\"2017-01-01\""));
    assert!(json.contains("\"2017-12-31\""));
    assert!(json.contains("\"cultivated\""));
}

#[test]
fn test_region_corners_in_rectangle() {
    let region = square(Coordinate::new(-98.5, 38.5), 3.75);
    let expression = CollectionQuery::cdl_cultivated().composite(&region).0.to_expression();
    let json = expression.to_string();
    assert!(json.contains("GeometryConstructors.Rectangle"));
    assert!(json.contains(&region.lon1.to_string()));
    assert!(json.contains(&region.lat2.to_string()));
}

#[test]
fn test_download_body() {
    let region = square(Coordinate::new(-98.5, 38.5), 3.75);
    let query = CollectionQuery::cdl_cultivated();
    let request = ExportRequest::new(query.bands.clone(), 20.0);
    let body = EarthEngineClient::download_body(&query.composite(&region), &request);

    assert_eq!(body["fileFormat"], "ZIPPED_GEO_TIFF_PER_BAND");
    assert_eq!(body["bandIds"], serde_json::json!(["cultivated"]));
    assert_eq!(body["filenamePrefix"], "image");

    let root = root_call(&body["expression"]);
    assert_eq!(root["functionName"], "Image.reproject");
    assert_eq!(root["arguments"]["scale"]["constantValue"], 20.0);
    assert_eq!(
        root["arguments"]["crs"]["functionInvocationValue"]["arguments"]["crs"]["constantValue"],
        "EPSG:3857"
    );
}

#[test]
fn test_composite_median_keeps_band_names() {
    let region = square(Coordinate::new(-98.5, 38.5), 3.75);
    for query in [
        CollectionQuery::sentinel2_true_color(),
        CollectionQuery::cdl_cultivated(),
    ] {
        let expression = query.composite(&region).0.to_expression();
        let select = root_call(&expression);
        let clip = &select["arguments"]["input"]["functionInvocationValue"];
        assert_eq!(clip["functionName"], "Image.clip");

        let composite = &clip["arguments"]["input"]["functionInvocationValue"];
        assert_eq!(composite["functionName"], "ImageCollection.median");
        assert!(composite["arguments"].get("reducer").is_none());

        // Any `Reducer.*` would rename bands before the select.
        let mut names = Vec::new();
        function_names(&expression, &mut names);
        assert!(!names.iter().any(|n| n.starts_with("Reducer.")));
    }
}
