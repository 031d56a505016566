/// One measurement at one timestamp, carrying float fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub measurement: String,
    /// Seconds since the Unix epoch.
    pub unix: i64,
    pub fields: Vec<(String, f64)>,
}

impl MetricPoint {
    pub fn new(measurement: impl Into<String>, unix: i64) -> Self {
        Self {
            measurement: measurement.into(),
            unix,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.push((name.into(), value));
        self
    }
}
