// Saved resumes, saved job analyses and skill suggestion sets.
// Thin HTTP layer over `store::MemStore`.

pub mod handlers;
