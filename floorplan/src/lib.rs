//! Floor-plan document model and editing engine for IntraMap indoor maps.
//!
//! This crate owns everything about a building map that is independent of the
//! drawing surface and the network: the persisted document, the conversion
//! between stored objects and live drawables, undo/redo, search, floor loading
//! with deferred icon glyphs, and the editor and viewer sessions that tie them
//! together. Hosts forward input events and perform the actual I/O; the
//! [`persist`] helpers keep local storage and offline caching consistent
//! between them.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`doc`] | `Building` / `Floor` / `MapObject` document and floor-id allocation |
//! | [`slug`] | Building-id sanitizing and validation |
//! | [`codec`] | `MapObject` ↔ `SceneObject` conversion |
//! | [`scene`] | Live drawables of the active floor, bounds and layering |
//! | [`icons`] | Built-in icon catalog |
//! | [`glyph`] | Icon SVG markup → drawable parts |
//! | [`color`] | Hex color helpers |
//! | [`load`] | Floor load barrier for deferred glyphs |
//! | [`camera`] | Pan/zoom camera, coordinate conversion, fit-to-content |
//! | [`hit`] | Hit-testing against the scene |
//! | [`input`] | Tools, modifier keys, keyboard shortcuts, line gesture |
//! | [`history`] | Undo/redo snapshots and the gesture latch |
//! | [`search`] | Label and tag search across floors |
//! | [`autosave`] | Draft autosave scheduling |
//! | [`persist`] | Local storage keys, drafts, offline cache, URL contract |
//! | [`demo`] | The bundled demo building |
//! | [`notice`] | User-facing notices |
//! | [`session`] | Editor session |
//! | [`viewer`] | Viewer session |
//! | [`consts`] | Shared constants (zoom limits, default sizes, storage keys) |

pub mod autosave;
pub mod camera;
pub mod codec;
pub mod color;
pub mod consts;
pub mod demo;
pub mod doc;
pub mod error;
pub mod glyph;
pub mod history;
pub mod hit;
pub mod icons;
pub mod input;
pub mod load;
pub mod notice;
pub mod persist;
pub mod scene;
pub mod search;
pub mod session;
pub mod slug;
pub mod viewer;
