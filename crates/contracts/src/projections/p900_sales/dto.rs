use serde::{Deserialize, Serialize};

/// One confirmed budget in the sales view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesRow {
    pub budget_id: String,
    pub code: String,
    pub description: String,
    pub status: String,
    pub cost: f64,
    pub sales_price: f64,
    pub margin: f64,
    pub line_count: usize,
    pub updated_at: String,
}

/// Totals over every confirmed budget, not only the current page
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SalesSummary {
    pub count: usize,
    pub total_cost: f64,
    pub total_sales: f64,
    pub total_margin: f64,
}

impl SalesSummary {
    pub fn from_rows(rows: &[SalesRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, r| {
            acc.count += 1;
            acc.total_cost += r.cost;
            acc.total_sales += r.sales_price;
            acc.total_margin += r.margin;
            acc
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    pub items: Vec<SalesRow>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub summary: SalesSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cost: f64, sales_price: f64) -> SalesRow {
        SalesRow {
            budget_id: "b".into(),
            code: "PRE-1".into(),
            description: "x".into(),
            status: "Confirmado".into(),
            cost,
            sales_price,
            margin: sales_price - cost,
            line_count: 1,
            updated_at: String::new(),
        }
    }

    #[test]
    fn summary_sums_rows() {
        let s = SalesSummary::from_rows(&[row(100.0, 150.0), row(40.0, 30.0)]);
        assert_eq!(s.count, 2);
        assert_eq!(s.total_cost, 140.0);
        assert_eq!(s.total_sales, 180.0);
        assert_eq!(s.total_margin, 40.0);
    }
}
