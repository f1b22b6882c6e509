pub mod keypoint;
pub mod skeleton;

pub use keypoint::{Keypoint, KeypointIndex, Pose};
pub use skeleton::{highlighted_joints, visible_bones, SKELETON_CONNECTIONS};
