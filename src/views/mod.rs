pub mod footer;
pub mod help;
pub mod navbar;
pub mod sidebar;
