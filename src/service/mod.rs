pub mod assembly_service;
pub mod calendar_service;
pub mod extraction_service;
pub mod scheduling_service;
pub mod slot_service;
pub mod window_service;
