//! The canonical `{post_processor, context}` options of single-step
//! resolution, and the two call conventions that build them.

use std::fmt;
use std::future::Future;

use descriptor::Raised;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::guard;

type PostProcessFn<T, U> = Box<dyn FnOnce(T) -> BoxFuture<'static, Result<U, Raised>> + Send>;

pub(crate) enum PostProcess<T, U> {
    Passthrough(fn(T) -> U),
    Apply(PostProcessFn<T, U>),
}

/// Options for [`crate::resolve_one`].
///
/// `T` is the producer's value type and `U` the type handed back after
/// post-processing (the same as `T` when there is no post-processor).
///
/// Record form:
/// ```
/// use resolver::ResolveOptions;
///
/// let options = ResolveOptions::<i32>::new()
///     .with_post_processor(|v: i32| Ok::<_, descriptor::Raised>(v * 2))
///     .with_context("doubling");
/// assert_eq!(options.context(), Some("doubling"));
/// assert!(options.has_post_processor());
/// ```
///
/// Legacy positional form:
/// ```
/// use resolver::ResolveOptions;
///
/// let options = ResolveOptions::positional(|v: i32| Ok::<_, descriptor::Raised>(v * 2), Some("doubling"));
/// assert_eq!(options.context(), Some("doubling"));
///
/// let context_only = ResolveOptions::<i32>::positional_context(Some("loading"));
/// assert_eq!(context_only.context(), Some("loading"));
/// assert!(!context_only.has_post_processor());
/// ```
pub struct ResolveOptions<T, U = T> {
    pub(crate) post_process: PostProcess<T, U>,
    pub(crate) context: Option<String>,
}

impl<T> ResolveOptions<T, T> {
    /// No post-processing and the default context.
    pub fn new() -> Self {
        Self { post_process: PostProcess::Passthrough(std::convert::identity), context: None }
    }

    /// Legacy positional convention with the post-processor slot left empty:
    /// only a context, or nothing at all.
    pub fn positional_context(context: Option<&str>) -> Self {
        Self {
            post_process: PostProcess::Passthrough(std::convert::identity),
            context: context.map(str::to_string),
        }
    }
}

impl<T> Default for ResolveOptions<T, T> {
    fn default() -> Self { Self::new() }
}

impl<T: Send + 'static, U> ResolveOptions<T, U> {
    /// Legacy positional convention: a post-processor followed by an
    /// optional context. Equivalent to the record form built with
    /// [`ResolveOptions::with_post_processor`] and
    /// [`ResolveOptions::with_context`].
    pub fn positional<F, E>(post_processor: F, context: Option<&str>) -> Self
    where
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
        E: Into<Raised>,
        U: Send + 'static,
    {
        ResolveOptions::<T>::new()
            .with_post_processor(post_processor)
            .with_optional_context(context.map(str::to_string))
    }

    /// Overrides the context used when normalizing a resolution failure.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        self.with_optional_context(Some(context.into()))
    }

    fn with_optional_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    /// Applies a synchronous transformation to the resolved value.
    pub fn with_post_processor<V, F, E>(self, post_processor: F) -> ResolveOptions<T, V>
    where
        F: FnOnce(T) -> Result<V, E> + Send + 'static,
        E: Into<Raised>,
        V: Send + 'static,
    {
        let apply: PostProcessFn<T, V> = Box::new(move |value| {
            let result = guard::call(move || post_processor(value));
            futures::future::ready(result).boxed()
        });
        ResolveOptions { post_process: PostProcess::Apply(apply), context: self.context }
    }

    /// Applies an asynchronous transformation to the resolved value.
    pub fn with_async_post_processor<V, F, Fut, E>(self, post_processor: F) -> ResolveOptions<T, V>
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: Into<Raised> + 'static,
        V: Send + 'static,
    {
        let apply: PostProcessFn<T, V> =
            Box::new(move |value| guard::call_async(move || post_processor(value)).boxed());
        ResolveOptions { post_process: PostProcess::Apply(apply), context: self.context }
    }
}

impl<T, U> ResolveOptions<T, U> {
    /// The override context, if one was given.
    pub fn context(&self) -> Option<&str> { self.context.as_deref() }

    /// Whether a post-processor is installed.
    pub fn has_post_processor(&self) -> bool { matches!(self.post_process, PostProcess::Apply(_)) }
}

impl<T, U> fmt::Debug for ResolveOptions<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveOptions")
            .field("post_processor", &self.has_post_processor())
            .field("context", &self.context)
            .finish()
    }
}
