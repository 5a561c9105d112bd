//! Executive overview sample data
//!
//! Static KPIs and a monthly revenue/expense series. Display only; nothing here
//! talks to the model.

use serde::Serialize;

/// Headline shown under the charts
pub const IMPLEMENTATION_STATUS: &str = "AI Implementation Status: 70% Complete";

/// A single KPI card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricData {
    pub name: &'static str,
    pub value: f64,
    /// Change in percent
    pub trend: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
}

impl MetricData {
    /// Trend with an explicit sign, e.g. `+8.5%`
    pub fn trend_label(&self) -> String {
        if self.trend >= 0.0 {
            format!("+{}%", self.trend)
        } else {
            format!("{}%", self.trend)
        }
    }

    /// Value followed by its unit, e.g. `245 $K`
    pub fn value_label(&self) -> String {
        match self.unit {
            Some(unit) => format!("{} {}", self.value, unit),
            None => self.value.to_string(),
        }
    }
}

/// One month of the revenue vs. expenses series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: &'static str,
    pub revenue: f64,
    pub expenses: f64,
    pub efficiency: f64,
}

impl ChartPoint {
    pub fn net(&self) -> f64 {
        self.revenue - self.expenses
    }
}

/// Everything the dashboard command prints
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub kpis: Vec<MetricData>,
    pub series: Vec<ChartPoint>,
    pub status: &'static str,
}

impl Dashboard {
    pub fn sample() -> Self {
        Self {
            kpis: kpis(),
            series: monthly_series(),
            status: IMPLEMENTATION_STATUS,
        }
    }

    /// Month with the highest efficiency score
    pub fn peak_efficiency(&self) -> Option<&ChartPoint> {
        self.series.iter().max_by(|a, b| a.efficiency.total_cmp(&b.efficiency))
    }
}

fn kpi(name: &'static str, value: f64, trend: f64, unit: &'static str) -> MetricData {
    MetricData {
        name,
        value,
        trend,
        unit: Some(unit),
    }
}

pub fn kpis() -> Vec<MetricData> {
    vec![
        kpi("Inventory Turnover", 4.2, 12.0, "x"),
        kpi("Onboarding Speed", 14.0, 40.0, "days"),
        kpi("OpEx Savings", 245.0, 8.5, "$K"),
        kpi("Knowledge Retrieval", 1.2, 50.0, "min"),
    ]
}

fn point(name: &'static str, revenue: f64, expenses: f64, efficiency: f64) -> ChartPoint {
    ChartPoint {
        name,
        revenue,
        expenses,
        efficiency,
    }
}

pub fn monthly_series() -> Vec<ChartPoint> {
    vec![
        point("Jan", 4000.0, 2400.0, 70.0),
        point("Feb", 3000.0, 1398.0, 65.0),
        point("Mar", 2000.0, 5800.0, 40.0),
        point("Apr", 2780.0, 3908.0, 55.0),
        point("May", 1890.0, 4800.0, 45.0),
        point("Jun", 2390.0, 3800.0, 60.0),
        point("Jul", 3490.0, 4300.0, 75.0),
    ]
}
