//! Display targets for dashboard views.

use crate::aggregation::summary::COLUMN_TITLES;
use crate::aggregation::SummaryTable;
use crate::output::{format_table, write_records};
use crate::view::dashboard::ViewModel;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Receives freshly computed tables. Implementations replace whatever they
/// displayed before; they never merge.
pub trait Renderer {
    fn render_map(&mut self, view: &ViewModel) -> Result<()>;
    fn render_summary(&mut self, table: &SummaryTable) -> Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render_map(&mut self, view: &ViewModel) -> Result<()> {
        (**self).render_map(view)
    }

    fn render_summary(&mut self, table: &SummaryTable) -> Result<()> {
        (**self).render_summary(table)
    }
}

/// Renders to every target in turn; reports the first failure after trying all.
impl Renderer for Vec<Box<dyn Renderer>> {
    fn render_map(&mut self, view: &ViewModel) -> Result<()> {
        let mut first_err = None;
        for r in self.iter_mut() {
            if let Err(e) = r.render_map(view) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn render_summary(&mut self, table: &SummaryTable) -> Result<()> {
        let mut first_err = None;
        for r in self.iter_mut() {
            if let Err(e) = r.render_summary(table) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Prints views as text tables.
pub struct TerminalRenderer<W> {
    out: W,
    /// Summary rows to print; `None` prints them all.
    summary_limit: Option<usize>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            summary_limit: None,
        }
    }

    pub fn with_summary_limit(mut self, limit: usize) -> Self {
        self.summary_limit = Some(limit);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render_map(&mut self, view: &ViewModel) -> Result<()> {
        let map = &view.map;
        writeln!(self.out, "Destinations ({})", view.controls.describe())?;

        if map.destinations.is_empty() {
            writeln!(self.out, "  no trips match the current filters")?;
        } else {
            let rows: Vec<Vec<String>> = map
                .destinations
                .iter()
                .map(|r| {
                    vec![
                        r.origin.clone(),
                        r.destination.clone(),
                        r.trips.to_string(),
                        format!("{:.1}", r.avg_duration),
                        format!("{:.0}%", r.proportion * 100.0),
                        r.color.to_string(),
                    ]
                })
                .collect();
            let headers = [
                "Origin",
                "Station",
                "No. of Trips",
                "Avg. Duration (mins)",
                "Share of Trips from Origin",
                "Color",
            ];
            write!(self.out, "{}", format_table(&headers, &rows))?;
        }

        for origin in &map.origins {
            writeln!(self.out, "Origin {} at ({:.4}, {:.4})", origin.origin, origin.lat, origin.lon)?;
        }
        for w in &map.warnings {
            writeln!(
                self.out,
                "warning: no coordinates for {:?} station '{}' ({} trips from {} not shown)",
                w.role, w.station, w.trips, w.origin
            )?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn render_summary(&mut self, table: &SummaryTable) -> Result<()> {
        let limit = self.summary_limit.unwrap_or(table.len());
        let rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .take(limit)
            .map(|r| r.display_cells().to_vec())
            .collect();

        writeln!(self.out, "Summary Table")?;
        write!(self.out, "{}", format_table(&COLUMN_TITLES, &rows))?;
        if limit < table.len() {
            writeln!(self.out, "... {} more stations", table.len() - limit)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Writes views as CSV files in a directory: `map.csv`, `origins.csv` and
/// `summary.csv`. Each render replaces the previous file.
pub struct CsvRenderer {
    dir: PathBuf,
}

impl CsvRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn map_path(&self) -> PathBuf {
        self.dir.join("map.csv")
    }

    pub fn origins_path(&self) -> PathBuf {
        self.dir.join("origins.csv")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join("summary.csv")
    }
}

impl Renderer for CsvRenderer {
    fn render_map(&mut self, view: &ViewModel) -> Result<()> {
        write_records(&self.map_path(), &view.map.destinations)?;
        write_records(&self.origins_path(), &view.map.origins)?;
        if !view.map.warnings.is_empty() {
            warn!(
                warnings = view.map.warnings.len(),
                "Some stations were left out of map.csv"
            );
        }
        debug!(dir = %self.dir.display(), "Map CSVs written");
        Ok(())
    }

    fn render_summary(&mut self, table: &SummaryTable) -> Result<()> {
        write_records(&self.summary_path(), &table.rows)?;
        debug!(dir = %self.dir.display(), "Summary CSV written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{MapDataset, MapResultRow, OriginMarkerRow, SummaryRow};
    use crate::view::controls::Controls;
    use std::env;
    use std::fs;

    fn view() -> ViewModel {
        ViewModel {
            controls: Controls::default(),
            map: MapDataset {
                destinations: vec![MapResultRow {
                    origin: "Union Station".to_string(),
                    destination: "Bay St / College St".to_string(),
                    lat: 43.66,
                    lon: -79.39,
                    trips: 4,
                    avg_duration: 11.25,
                    color_bucket: 8,
                    color: "#800026",
                    proportion: 1.0,
                }],
                origins: vec![OriginMarkerRow {
                    origin: "Union Station".to_string(),
                    lat: 43.645,
                    lon: -79.38,
                }],
                warnings: Vec::new(),
            },
        }
    }

    fn summary() -> SummaryTable {
        let row = |origin: &str, trips| SummaryRow {
            origin: origin.to_string(),
            trips,
            avg_duration_mins: 12.0,
            top_one: "X, 1.00".to_string(),
            top_two: "-".to_string(),
            top_three: "-".to_string(),
        };
        SummaryTable {
            rows: vec![row("Union Station", 1200), row("Bay St / College St", 3)],
        }
    }

    #[test]
    fn test_terminal_renderer_map() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render_map(&view()).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.contains("Bay St / College St"));
        assert!(text.contains("11.2") || text.contains("11.3"));
        assert!(text.contains("100%"));
        assert!(text.contains("Origin Union Station at (43.6450, -79.3800)"));
    }

    #[test]
    fn test_terminal_renderer_empty_map() {
        let mut empty = view();
        empty.map = MapDataset::default();

        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render_map(&empty).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.contains("no trips match"));
    }

    #[test]
    fn test_terminal_renderer_summary_limit() {
        let mut renderer = TerminalRenderer::new(Vec::new()).with_summary_limit(1);
        renderer.render_summary(&summary()).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.contains("No. of Trips"));
        assert!(text.contains("1,200"));
        assert!(!text.contains("Bay St / College St"));
        assert!(text.contains("... 1 more stations"));
    }

    #[test]
    fn test_csv_renderer_writes_tables() {
        let dir = env::temp_dir().join("bikeshare_dash_csv_renderer");
        let _ = fs::remove_dir_all(&dir);

        let mut renderer = CsvRenderer::new(&dir).unwrap();
        renderer.render_map(&view()).unwrap();
        renderer.render_summary(&summary()).unwrap();

        let map = fs::read_to_string(renderer.map_path()).unwrap();
        assert!(map.starts_with("origin,destination,lat,lon,trips,avg_duration,color_bucket,color,proportion"));
        assert_eq!(map.lines().count(), 2);

        let summary_csv = fs::read_to_string(renderer.summary_path()).unwrap();
        assert!(summary_csv.starts_with("origin,trips,avg_duration_mins,top_one,top_two,top_three"));
        assert_eq!(summary_csv.lines().count(), 3);

        assert!(renderer.origins_path().exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_fanout_renders_all_targets() {
        let dir = env::temp_dir().join("bikeshare_dash_fanout");
        let _ = fs::remove_dir_all(&dir);

        let mut targets: Vec<Box<dyn Renderer>> = vec![
            Box::new(TerminalRenderer::new(std::io::sink())),
            Box::new(CsvRenderer::new(&dir).unwrap()),
        ];
        targets.render_map(&view()).unwrap();

        assert!(dir.join("map.csv").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
