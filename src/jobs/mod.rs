pub mod stale_closer;
