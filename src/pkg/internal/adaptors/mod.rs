pub mod apply_jobs {
    pub mod mutators;
    pub mod selectors;
    pub mod spec;
}
pub mod articles {
    pub mod mutators;
    pub mod selectors;
    pub mod spec;
}
pub mod companies {
    pub mod mutators;
    pub mod selectors;
    pub mod spec;
}
pub mod evaluations {
    pub mod mutators;
    pub mod selectors;
    pub mod spec;
}
pub mod jobs {
    pub mod mutators;
    pub mod selectors;
    pub mod spec;
}
pub mod master {
    pub mod mutators;
    pub mod selectors;
    pub mod spec;
}
pub mod reports {
    pub mod mutators;
    pub mod selectors;
    pub mod spec;
}
pub mod roles {
    pub mod mutators;
    pub mod selectors;
    pub mod spec;
}
pub mod users {
    pub mod mutators;
    pub mod selectors;
    pub mod spec;
}
