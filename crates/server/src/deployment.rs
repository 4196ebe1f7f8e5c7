use db::DBService;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct Deployment {
    db: DBService,
}

impl Deployment {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }
}
