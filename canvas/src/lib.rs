//! Slide layout engine for the presentation designer.
//!
//! This crate owns everything about a slide layout that does not need a
//! browser or a network: the responsive canvas size and pixel/inch
//! conversion, the ordered store of typed placeholders, hit-testing, the
//! drag/resize gesture state machine, and the transport payload codec. The
//! host UI is responsible only for wiring pointer events to
//! [`engine::EngineCore`] and drawing the resulting document.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction controller: [`engine::EngineCore`] and its [`engine::Action`]s |
//! | [`doc`] | Layout document, element types, and the element store |
//! | [`geometry`] | Slide rectangles, canvas sizing, pixel/inch conversion |
//! | [`input`] | Buttons, keys, selection, and the gesture state machine |
//! | [`hit`] | Hit-testing element bodies and corner handles |
//! | [`codec`] | Transport payload encoding and tolerant decoding |
//! | [`consts`] | Slide dimensions, size bounds, and element defaults |

pub mod codec;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
