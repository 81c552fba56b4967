use crate::{
    api::ModuleNew,
    layouts::{Backend, Module},
    oep::ModuleNewImpl,
};

impl<B> ModuleNew<B> for Module<B>
where
    B: Backend + ModuleNewImpl<B>,
{
    fn new(device_id: u32) -> Self {
        B::new_impl(device_id)
    }
}
