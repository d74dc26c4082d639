pub trait FormatHMS {
    fn format_hms(&self) -> String;
}

impl FormatHMS for i64 {
    fn format_hms(&self) -> String {
        let total = (*self).max(0);
        let h = total / 3600;
        let m = (total % 3600) / 60;
        let s = total % 60;
        format!("{:02}:{:02}:{:02}", h, m, s)
    }
}
