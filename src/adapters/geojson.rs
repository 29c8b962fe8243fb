use crate::domain::view::Marker;
use crate::utils::error::Result;
use serde_json::{json, Value};
use std::path::Path;

/// The marker layer as a GeoJSON FeatureCollection; coordinates are `[lng, lat]`.
pub fn feature_collection(markers: &[Marker]) -> Value {
    let features: Vec<Value> = markers
        .iter()
        .map(|marker| {
            json!({
                "type": "Feature",
                "id": marker.id.0,
                "geometry": {
                    "type": "Point",
                    "coordinates": [marker.position.lng, marker.position.lat],
                },
                "properties": {
                    "name": marker.name,
                    "label": marker.icon.label,
                    "band": marker.icon.band,
                    "marker-color": marker.icon.color,
                    "popup": marker.popup.to_html(),
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

pub fn write_feature_collection(path: &Path, markers: &[Marker]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(&feature_collection(markers))?;
    std::fs::write(path, body)?;
    Ok(())
}
