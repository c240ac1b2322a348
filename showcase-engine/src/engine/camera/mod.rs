//! Scroll-driven orbit camera.
//!
//! The director maps camera timeline progress to an eased spherical pose
//! between the two bracketing sections; the rig turns that pose into the
//! scene camera's transform.

/// Section bracketing, smoothstep blending and the `OrbitTarget` resource.
pub mod orbit_director;

/// Scene camera spawn and per-frame transform update.
pub mod camera_rig;
