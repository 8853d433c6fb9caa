// Ad generation: the request form, product/image selection, progress, and the call itself.
// Upstream calls go through `StudioBackend`; nothing here builds HTTP requests.

pub mod builder;
pub mod handlers;
pub mod pipeline;
pub mod progress;
pub mod selection;
