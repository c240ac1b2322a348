//! Host page bridge for the embedded showcase.
//!
//! On wasm the page talks to the canvas through `postMessage` using JSON-RPC
//! 2.0 envelopes. Requests carry an `id` and get exactly one response. The
//! showcase pushes notifications of its own whenever something the page may
//! want to mirror changes in tier, quality or active section. Native builds
//! keep the queues but have no page to talk to, so outgoing messages are
//! dropped.
//!
//! ## Methods
//!
//! | method                  | params                      | result                                           |
//! |-------------------------|-----------------------------|--------------------------------------------------|
//! | `get_fps`               | none                        | `{ fps }`                                        |
//! | `get_device_tier`       | none                        | `{ tier, reason, viewport, renderer }`           |
//! | `get_quality_profile`   | none                        | the serialised `QualityProfile`                  |
//! | `get_scroll_signal`     | none                        | `{ scroll_offset, velocity, timestamp }`         |
//! | `get_orbit_target`      | none                        | `{ azimuth, polar_angle, radius, look_at_y }`    |
//! | `set_renderer_override` | `{ renderer: string\|null }` | `{ success, renderer }`                          |
//! | `start_layout_audit`    | none                        | `{ success }`                                    |
//!
//! `set_renderer_override` re-runs classification against the supplied
//! renderer string as if the probe had returned it. A null or blank string
//! restores probing.
//!
//! `start_layout_audit` queues a run of the wheel scenario against the live
//! document overlay. The audit starts once the loading mask has cleared and
//! is ignored while another run is in progress. Results arrive as
//! `layout_violation` notifications and a summary in the log.
//!
//! ## Notifications
//!
//! - `fps_update` `{ fps, tier }` twice a second.
//! - `tier_changed` `{ tier, reason }` on the first frame and after any
//!   reclassification that moves the tier.
//! - `quality_changed` carries the whole profile. Fast scrolling toggles
//!   chromatic aberration, so expect bursts while flinging.
//! - `section_changed` `{ index }` when the camera settles nearer another
//!   section.
//! - `layout_violation` `{ step, viewport, scroll_offset, violations }` for
//!   each audit capture that broke a layout check.
//!
//! Malformed envelopes are answered with a `debug_message` notification
//! rather than an error response, since they have no usable `id`. Unknown
//! methods get `-32601`, bad params `-32602`.

/// JSON-RPC envelopes, message queues and the showcase method handlers.
pub mod web_rpc;
