//! GEF content generator for tests.
//!
//! Builds header text line by line so tests can vary a single tag without
//! spelling out the whole file.

/// Builder for GEF file content.
#[derive(Debug, Clone, Default)]
pub struct GefBuilder {
    lines: Vec<String>,
    data_rows: usize,
}

impl GefBuilder {
    pub fn new() -> Self {
        Self {
            lines: vec!["#GEFID= 1, 1, 0".to_string()],
            data_rows: 0,
        }
    }

    pub fn test_id(self, name: &str) -> Self {
        self.line(format!("#TESTID= {}", name))
    }

    pub fn position(self, code: i64, x: f64, y: f64) -> Self {
        self.line(format!("#XYID= {}, {:.2}, {:.2}, 0.01, 0.01", code, x, y))
    }

    pub fn elevation(self, code: i64, z: f64) -> Self {
        self.line(format!("#ZID= {}, {:.2}, 0.01", code, z))
    }

    pub fn start_date(self, year: i32, month: u32, day: u32) -> Self {
        self.line(format!("#STARTDATE= {}, {}, {}", year, month, day))
    }

    /// Append an arbitrary header line.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Number of synthetic measurement rows after `#EOH=`.
    pub fn data_rows(mut self, rows: usize) -> Self {
        self.data_rows = rows;
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("#EOH=\n");
        for i in 0..self.data_rows {
            let depth = 0.02 * (i + 1) as f64;
            let qc = 0.25 + 0.15 * i as f64;
            out.push_str(&format!("{:.4};{:.3};\n", depth, qc));
        }
        out
    }
}
