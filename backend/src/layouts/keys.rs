use crate::layouts::Backend;

/// Evaluation keys consumed by [`crate::api::EvaluateLut`] and [`crate::api::Keyswitch`].
pub struct ServerKeys<B: Backend> {
    pub bsk: B::BootstrapKey,
    pub ksk: B::KeyswitchKey,
}

impl<B: Backend> ServerKeys<B> {
    pub fn new(bsk: B::BootstrapKey, ksk: B::KeyswitchKey) -> Self {
        Self { bsk, ksk }
    }
}
