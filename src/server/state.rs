use crate::providers::Provider;
use crate::translator::Translator;

pub(crate) struct ServerState<P: Provider> {
    pub(crate) translator: Translator<P>,
}
