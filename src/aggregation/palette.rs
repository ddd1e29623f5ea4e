/// Number of shades in the destination palette.
pub const BUCKET_COUNT: usize = 9;

/// Yellow-orange-red ramp, lightest first. Index 8 is reserved for the
/// busiest destination of an origin.
pub const YL_OR_RD_9: [&str; BUCKET_COUNT] = [
    "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026",
    "#800026",
];

/// Maps a trip count to a palette index relative to `max_trips`.
///
/// Returns `None` when `max_trips` is zero.
pub fn color_bucket(trips: usize, max_trips: usize) -> Option<usize> {
    if max_trips == 0 {
        return None;
    }
    let scaled = (trips as f64 / max_trips as f64) * (BUCKET_COUNT - 1) as f64;
    Some((scaled.floor() as usize).min(BUCKET_COUNT - 1))
}

pub fn color(bucket: usize) -> &'static str {
    YL_OR_RD_9[bucket.min(BUCKET_COUNT - 1)]
}
