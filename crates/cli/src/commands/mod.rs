pub(crate) mod companions;
pub(crate) mod migrate;
pub(crate) mod seed;
pub(crate) mod serve;
