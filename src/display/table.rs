//! Column layout of the residents table.
//!
//! Placeholder rows ("no data", load errors) span the whole table, so their
//! span is always derived from the live column list.

pub const VOTE_COLUMN: &str = "Đã bỏ phiếu";

const BASE_COLUMNS: [&str; 8] = [
    "Họ và Tên",
    "Tổ",
    "Email",
    "Số điện thoại",
    "Địa chỉ",
    "Loại cư trú",
    "Trạng thái",
    "Hành động",
];

// The vote toggle sits right after the group column
const VOTE_COLUMN_POSITION: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidentTable {
    columns: Vec<&'static str>,
}

impl ResidentTable {
    /// Table without the voting column.
    pub fn base() -> Self {
        Self {
            columns: BASE_COLUMNS.to_vec(),
        }
    }

    pub fn with_vote_column() -> Self {
        let mut table = Self::base();
        table.columns.insert(VOTE_COLUMN_POSITION, VOTE_COLUMN);
        table
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn placeholder_span(&self) -> usize {
        self.column_count()
    }
}

impl Default for ResidentTable {
    fn default() -> Self {
        Self::with_vote_column()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_column_adds_exactly_one_to_span() {
        let base = ResidentTable::base();
        let table = ResidentTable::with_vote_column();

        assert_eq!(table.placeholder_span(), base.placeholder_span() + 1);
        assert_eq!(table.placeholder_span(), table.columns().len());
        assert_eq!(base.placeholder_span(), BASE_COLUMNS.len());
    }

    #[test]
    fn vote_column_follows_group_column() {
        let table = ResidentTable::default();
        let group = table.columns().iter().position(|c| *c == "Tổ").unwrap();
        assert_eq!(table.columns()[group + 1], VOTE_COLUMN);
    }
}
