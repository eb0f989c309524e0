//! Immutable pipeline stages.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::sync::Arc;

use config::Defaults;
use descriptor::{
    normalize, ErrorDescriptor, Payload, PipelineError, Raised, ResultPair, StepInfo, StepType,
};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use resolver::{guard, Producer};

use crate::step::{self, StepRecord};

/// A stage's accumulated result: computed at most once, awaitable from any
/// number of handles.
pub type SharedPair<T> = Shared<BoxFuture<'static, ResultPair<T>>>;

type StepFn<T, R> = Box<dyn FnOnce(T) -> BoxFuture<'static, Result<R, Raised>> + Send>;

/// One link in a pipeline chain.
///
/// Chaining (`transform`, `pipe`) never touches `self`; it returns a new
/// stage holding a handle to this stage's shared result. Nothing runs until
/// some stage of the chain is awaited, and every step runs at most once no
/// matter how many descendants or `execute` calls observe it.
pub struct Stage<T> {
    pair: SharedPair<T>,
    context: String,
    steps: Arc<Vec<StepRecord>>,
    default_status: u16,
}

impl<T> Stage<T>
where
    T: Payload + Clone + Send + Sync + 'static,
{
    /// Starts a chain with the built-in [`Defaults`].
    pub fn new(producer: Producer<T>) -> Self { Self::with_defaults(producer, &Defaults::default()) }

    /// Starts a chain whose initialization is named `context`.
    pub fn with_context(producer: Producer<T>, context: impl Into<String>) -> Self {
        let defaults = Defaults::default();
        Self::start(producer, context.into(), defaults.default_status)
    }

    /// Starts a chain using configured defaults.
    pub fn with_defaults(producer: Producer<T>, defaults: &Defaults) -> Self {
        Self::start(producer, defaults.pipeline_context.clone(), defaults.default_status)
    }

    fn start(producer: Producer<T>, context: String, default_status: u16) -> Self {
        let init_context = context.clone();
        let pair = async move {
            let info = StepInfo::initialization(init_context.clone());
            let value = match producer.resolve().await {
                Ok(value) => value,
                Err(raised) => return Err(capture(&raised, &init_context, info)),
            };
            if value.is_absent() {
                return Err(step::empty_value(step::INITIAL_EMPTY, &init_context, info));
            }
            if let Some(raised) = value.domain_failure() {
                return Err(capture(&raised, &init_context, info));
            }
            Ok(value)
        }
        .boxed()
        .shared();

        Self { pair, context, steps: Arc::new(Vec::new()), default_status }
    }

    /// Maps the value with a synchronous function.
    ///
    /// The step's context defaults to `"Transform step {index}"`.
    pub fn transform<R, F, E>(&self, f: F) -> Stage<R>
    where
        R: Payload + Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Result<R, E> + Send + 'static,
        E: Into<Raised> + 'static,
    {
        self.chain(StepType::Transform, None, sync_step(f))
    }

    /// [`Stage::transform`] with an explicit step context.
    pub fn transform_as<R, F, E>(&self, f: F, context: impl Into<String>) -> Stage<R>
    where
        R: Payload + Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Result<R, E> + Send + 'static,
        E: Into<Raised> + 'static,
    {
        self.chain(StepType::Transform, Some(context.into()), sync_step(f))
    }

    /// Maps the value with an asynchronous function.
    pub fn transform_async<R, F, Fut, E>(&self, f: F) -> Stage<R>
    where
        R: Payload + Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        E: Into<Raised> + 'static,
    {
        self.chain(StepType::Transform, None, async_step(f))
    }

    /// [`Stage::transform_async`] with an explicit step context.
    pub fn transform_async_as<R, F, Fut, E>(&self, f: F, context: impl Into<String>) -> Stage<R>
    where
        R: Payload + Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        E: Into<Raised> + 'static,
    {
        self.chain(StepType::Transform, Some(context.into()), async_step(f))
    }

    /// Starts a new asynchronous sub-operation from the (non-empty) value.
    ///
    /// The step's context defaults to `"Pipe step {index}"`. An absent
    /// result is a success; a result that is a domain failure is not.
    pub fn pipe<R, F, Fut, E>(&self, f: F) -> Stage<R>
    where
        R: Payload + Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        E: Into<Raised> + 'static,
    {
        self.chain(StepType::Pipe, None, async_step(f))
    }

    /// [`Stage::pipe`] with an explicit step context.
    pub fn pipe_as<R, F, Fut, E>(&self, f: F, context: impl Into<String>) -> Stage<R>
    where
        R: Payload + Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        E: Into<Raised> + 'static,
    {
        self.chain(StepType::Pipe, Some(context.into()), async_step(f))
    }

    fn chain<R>(&self, step_type: StepType, context: Option<String>, run: StepFn<T, R>) -> Stage<R>
    where
        R: Payload + Clone + Send + Sync + 'static,
    {
        let index = self.steps.len();
        let context = context.unwrap_or_else(|| step::default_context(step_type, index));
        let info = StepInfo::step(index, step_type, self.context.clone());

        let prior = self.pair.clone();
        let step_context = context.clone();
        let pair = async move {
            let value = match prior.await {
                Ok(value) => value,
                Err(upstream) => return Err(upstream),
            };
            if value.is_absent() {
                let message = step::input_empty_message(step_type);
                return Err(step::empty_value(message, &step_context, info));
            }

            tracing::trace!(index, step = %step_type, context = %step_context, "running pipeline step");
            let output = match run(value).await {
                Ok(output) => output,
                Err(raised) => return Err(capture(&raised, &step_context, info)),
            };

            match step_type {
                StepType::Pipe => match output.domain_failure() {
                    Some(raised) => Err(capture(&raised, &step_context, info)),
                    None => Ok(output),
                },
                _ if output.is_absent() => {
                    Err(step::empty_value(step::TRANSFORM_OUTPUT_EMPTY, &step_context, info))
                }
                _ => Ok(output),
            }
        }
        .boxed()
        .shared();

        let mut steps = Vec::with_capacity(index + 1);
        steps.extend(self.steps.iter().cloned());
        steps.push(StepRecord { index, step_type, context: context.clone() });

        Stage { pair, context, steps: Arc::new(steps), default_status: self.default_status }
    }
}

impl<T> Stage<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Awaits this stage's result. Safe to call any number of times; the
    /// chain runs once.
    pub async fn execute(&self) -> ResultPair<T> { self.pair.clone().await }

    /// Like [`Stage::execute`], with the failure wrapped in a raise-able
    /// [`PipelineError`].
    pub async fn execute_or_raise(&self) -> Result<T, PipelineError> {
        let default_status = self.default_status;
        self.execute().await.map_err(|d| PipelineError::with_default_status(d, default_status))
    }

    /// This stage's context: the pipeline context for the first stage,
    /// the step context for every later one.
    pub fn context(&self) -> &str { &self.context }

    /// Steps chained so far in this stage's lineage, oldest first.
    pub fn steps(&self) -> &[StepRecord] { &self.steps }
}

impl<T> Clone for Stage<T> {
    fn clone(&self) -> Self {
        Self {
            pair: self.pair.clone(),
            context: self.context.clone(),
            steps: Arc::clone(&self.steps),
            default_status: self.default_status,
        }
    }
}

impl<T> IntoFuture for Stage<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = ResultPair<T>;
    type IntoFuture = SharedPair<T>;

    fn into_future(self) -> Self::IntoFuture { self.pair }
}

impl<T: Clone> fmt::Debug for Stage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("context", &self.context)
            .field("steps", &self.steps)
            .field("settled", &self.pair.peek().is_some())
            .finish()
    }
}

fn sync_step<T, R, F, E>(f: F) -> StepFn<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: FnOnce(T) -> Result<R, E> + Send + 'static,
    E: Into<Raised> + 'static,
{
    Box::new(move |value| futures::future::ready(guard::call(move || f(value))).boxed())
}

fn async_step<T, R, F, Fut, E>(f: F) -> StepFn<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: FnOnce(T) -> Fut + Send + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    E: Into<Raised> + 'static,
{
    Box::new(move |value| guard::call_async(move || f(value)).boxed())
}

fn capture(raised: &Raised, context: &str, info: StepInfo) -> ErrorDescriptor {
    let descriptor = normalize(raised, context, Some(info));
    tracing::debug!(
        context = %descriptor.context,
        name = %descriptor.name,
        index = ?descriptor.step_index(),
        "pipeline step failed: {}",
        descriptor.message
    );
    descriptor
}
