


// Boundary and engine tests
mod engine;

use crate::FormData;

/// A -4.00/-1.00 and -3.50/-0.50 prescription in a medium frame
pub(crate) fn sample_form() -> FormData {
    FormData::from_json(
        r#"{
            "prescription": {
                "rightEye": { "sph": -4.0, "cyl": -1.0, "axis": 90 },
                "leftEye": { "sph": -3.5, "cyl": -0.5, "axis": 80 }
            },
            "frame": { "size": "medium" },
            "lensType": "single_vision",
            "priority": { "thickness": 50, "price": 30, "quality": 70 }
        }"#,
    )
    .unwrap()
}

pub(crate) fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
