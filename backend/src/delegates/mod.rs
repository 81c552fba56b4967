mod context;
mod device;
mod lwe;
mod module;
mod pbs;
