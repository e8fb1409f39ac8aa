//! Wire schema of the device service's JSON frames.
//!
//! Vectors travel as 3-element arrays and matrices as 3x3 arrays of arrays.
//! Every field except entity ids is optional; absent values leave the
//! corresponding model field at its default.

use serde::Deserialize;
use serde_json::Value;

pub(crate) type Vec3 = [f64; 3];
pub(crate) type Mat3 = [[f64; 3]; 3];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireFrame {
    pub id: Option<u64>,
    pub timestamp: Option<u64>,
    pub current_frames_per_second: Option<f64>,
    pub hands: Option<Vec<Value>>,
    pub pointables: Option<Vec<Value>>,
    pub gestures: Option<Vec<Value>>,
    pub interaction_box: Option<WireInteractionBox>,
    pub r: Option<Mat3>,
    pub s: Option<f64>,
    pub t: Option<Vec3>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireInteractionBox {
    pub center: Vec3,
    pub size: Vec3,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireHand {
    pub id: i64,
    #[serde(rename = "type")]
    pub hand_type: Option<String>,
    pub direction: Option<Vec3>,
    pub palm_normal: Option<Vec3>,
    pub palm_position: Option<Vec3>,
    pub stabilized_palm_position: Option<Vec3>,
    pub palm_velocity: Option<Vec3>,
    pub sphere_center: Option<Vec3>,
    pub sphere_radius: Option<f64>,
    pub r: Option<Mat3>,
    pub s: Option<f64>,
    pub t: Option<Vec3>,
    pub time_visible: Option<f64>,
    pub confidence: Option<f64>,
    pub grab_strength: Option<f64>,
    pub pinch_strength: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePointable {
    pub id: i64,
    #[serde(default)]
    pub tool: bool,
    pub hand_id: Option<i64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub direction: Option<Vec3>,
    pub tip_position: Option<Vec3>,
    pub stabilized_tip_position: Option<Vec3>,
    pub tip_velocity: Option<Vec3>,
    pub touch_distance: Option<f64>,
    pub touch_zone: Option<String>,
    pub time_visible: Option<f64>,
    #[serde(rename = "type")]
    pub finger_type: Option<i64>,
    pub dip_position: Option<Vec3>,
    pub pip_position: Option<Vec3>,
    pub mcp_position: Option<Vec3>,
    pub carp_position: Option<Vec3>,
    pub btip_position: Option<Vec3>,
    pub bases: Option<[Mat3; 4]>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireGesture {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub gesture_type: String,
    pub state: Option<String>,
    pub duration: Option<u64>,
    #[serde(default)]
    pub hand_ids: Vec<i64>,
    #[serde(default)]
    pub pointable_ids: Vec<i64>,
    pub center: Option<Vec3>,
    pub normal: Option<Vec3>,
    pub progress: Option<f64>,
    pub radius: Option<f64>,
    pub start_position: Option<Vec3>,
    pub position: Option<Vec3>,
    pub direction: Option<Vec3>,
    pub speed: Option<f64>,
}
