// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Camera math allowances — float comparisons and lossy casts are intentional
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
// Pedantic/nursery allowances
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::redundant_pub_crate)]
#![allow(clippy::multiple_crate_versions)]

//! Camera-control and scene-state engine for panoramic tours.
//!
//! Panoview turns pitch/yaw/field-of-view state into rendered views. It
//! unifies mouse, touch, platform-pointer, wheel, keyboard, and
//! device-orientation input into one drag model, runs a self-starting and
//! self-stopping animation loop with inertia and auto-rotation, folds a
//! layered tour configuration into one active snapshot per scene, and
//! sequences crossfade transitions between scenes.
//!
//! The GPU backend and the host event loop stay outside the crate: pixels
//! are produced by a [`renderer::Renderer`] implementation, and frame
//! scheduling/timers are provided by an [`animation::FrameHost`]. Scene
//! selection is typically driven externally (e.g. by a multiplayer session
//! service calling [`viewer::Viewer::load_scene`]).
//!
//! # Key entry points
//!
//! - [`viewer::Viewer`] - the per-instance engine facade
//! - [`config::TourConfig`] - layered tour configuration (JSON or TOML)
//! - [`renderer::Renderer`] - contract for the rendering backend
//! - [`animation::FrameHost`] - contract for the host scheduler

pub mod animation;
pub mod camera;
pub mod config;
pub mod error;
pub mod event;
pub mod hotspot;
pub mod input;
pub mod renderer;
pub mod viewer;
