use serde::{Deserialize, Serialize};

use maple_wfe_types::{Mark, Trace};

/// A value together with the append-only trace that produced it.
///
/// Equality compares values only: the trace is provenance, not identity.
/// Use [`Witnessed::same_witness`] to compare value and trace together.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Witnessed<A> {
    value: A,
    trace: Trace,
}

impl<A> Witnessed<A> {
    /// Lift a value with an empty trace.
    pub fn pure(value: A) -> Self {
        Self {
            value,
            trace: Trace::new(),
        }
    }

    pub fn new(value: A, trace: Trace) -> Self {
        Self { value, trace }
    }

    /// A value witnessed by exactly one mark.
    pub fn marked(value: A, mark: Mark) -> Self {
        Self {
            value,
            trace: Trace::single(mark),
        }
    }

    pub fn value(&self) -> &A {
        &self.value
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn into_value(self) -> A {
        self.value
    }

    pub fn into_parts(self) -> (A, Trace) {
        (self.value, self.trace)
    }

    /// Monadic bind: apply `f` to the value; the result's trace is this
    /// trace followed by the trace `f` produced.
    pub fn bind<B, F>(self, f: F) -> Witnessed<B>
    where
        F: FnOnce(A) -> Witnessed<B>,
    {
        let Witnessed { value, mut trace } = self;
        let next = f(value);
        trace.append(next.trace);
        Witnessed {
            value: next.value,
            trace,
        }
    }

    /// Trace-preserving map.
    pub fn map<B, F>(self, f: F) -> Witnessed<B>
    where
        F: FnOnce(A) -> B,
    {
        Witnessed {
            value: f(self.value),
            trace: self.trace,
        }
    }

    /// Append a mark without touching the value.
    pub fn tell(mut self, mark: Mark) -> Self {
        self.trace.push(mark);
        self
    }

    /// Append a whole trace without touching the value.
    pub fn tell_all(mut self, trace: Trace) -> Self {
        self.trace.append(trace);
        self
    }

    /// Collect witnessed values into one, concatenating traces in input order.
    pub fn sequence(items: Vec<Witnessed<A>>) -> Witnessed<Vec<A>> {
        let mut values = Vec::with_capacity(items.len());
        let mut trace = Trace::new();
        for item in items {
            values.push(item.value);
            trace.append(item.trace);
        }
        Witnessed { value: values, trace }
    }
}

impl<A: PartialEq> Witnessed<A> {
    /// Value equality *and* identical trace, mark for mark.
    pub fn same_witness(&self, other: &Witnessed<A>) -> bool {
        self.value == other.value && self.trace == other.trace
    }
}

impl<A: PartialEq> PartialEq for Witnessed<A> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<A: Eq> Eq for Witnessed<A> {}

/// Failures travel as values so that a failed step is still witnessed.
impl<T, E> Witnessed<Result<T, E>> {
    /// Continue with `f` on `Ok`; an `Err` passes through with its trace intact.
    pub fn bind_ok<U, F>(self, f: F) -> Witnessed<Result<U, E>>
    where
        F: FnOnce(T) -> Witnessed<Result<U, E>>,
    {
        self.bind(|result| match result {
            Ok(value) => f(value),
            Err(e) => Witnessed::pure(Err(e)),
        })
    }

    pub fn map_ok<U, F>(self, f: F) -> Witnessed<Result<U, E>>
    where
        F: FnOnce(T) -> U,
    {
        self.map(|result| result.map(f))
    }

    pub fn is_ok(&self) -> bool {
        self.value.is_ok()
    }
}

/// Kleisli composition `f >=> g`.
pub fn kleisli<A, B, C, F, G>(f: F, g: G) -> impl Fn(A) -> Witnessed<C>
where
    F: Fn(A) -> Witnessed<B>,
    G: Fn(B) -> Witnessed<C>,
{
    move |a| f(a).bind(&g)
}
