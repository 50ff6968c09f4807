#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub phone_no: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(phone_no: String) -> Self {
        Self { phone_no }
    }
}
