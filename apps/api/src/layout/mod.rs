// PDF page layout: static font metrics, word wrap and block pagination.
// Produces plain draw ops; render::pdf paints them. CPU-bound, so callers run
// it inside tokio::task::spawn_blocking.

pub mod flow;
pub mod font_metrics;
