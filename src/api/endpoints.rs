//! URL builders for the Classore admin API

/// Admin API prefix every resource lives under.
pub const ADMIN_BASE_PATH: &str = "/admin";

/// Resource names the generic CRUD operations accept.
pub mod resources {
    pub const EXAMINATIONS: &str = "examinations";
    pub const BUNDLES: &str = "bundles";
    pub const SUBJECTS: &str = "subjects";
    pub const CHAPTERS: &str = "chapters";
    pub const CHAPTER_MODULES: &str = "chapter-modules";
    pub const QUESTIONS: &str = "questions";
    pub const ROLES: &str = "roles";
    pub const USERS: &str = "users";
}

/// `POST {base}/auth/login`
pub fn login(base_url: &str) -> String {
    format!("{base_url}/auth/login")
}

/// `PUT {base}/admin/learning/chunk_uploads/{module_id}`
pub fn chunk_upload(base_url: &str, module_id: &str) -> String {
    format!("{base_url}{ADMIN_BASE_PATH}/learning/chunk_uploads/{module_id}")
}

/// Collection endpoint for a named resource.
pub fn resource_collection(base_url: &str, resource: &str) -> String {
    format!("{base_url}{ADMIN_BASE_PATH}/{resource}")
}

/// Record endpoint for a named resource.
pub fn resource_record(base_url: &str, resource: &str, id: &str) -> String {
    format!("{base_url}{ADMIN_BASE_PATH}/{resource}/{id}")
}

/// Publish endpoint for a named resource record.
pub fn resource_publish(base_url: &str, resource: &str, id: &str) -> String {
    format!("{base_url}{ADMIN_BASE_PATH}/{resource}/{id}/publish")
}
