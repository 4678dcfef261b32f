pub mod specialty;
pub mod registry;
pub mod matching;

pub use specialty::SpecialtyDirectory;
pub use registry::DoctorRegistry;
pub use matching::DoctorMatchingService;
