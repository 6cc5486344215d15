use std::sync::Arc;

/// Creates an [`Error`] from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// Returns early with an [`Error`] built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// An error that can occur in Trellis.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

#[derive(Debug)]
enum ErrorKind {
    /// The domain error: a class or accessor was used in a way its mapping
    /// metadata does not allow. Raised synchronously at the point of misuse.
    Mapping(String),

    /// A failure reported by the graph store transport. Never wrapped or
    /// retried by the mapping layer.
    Store(String),

    /// A stored value could not be converted to the requested shape.
    Conversion { value: &'static str, target: &'static str },

    Anyhow(anyhow::Error),

    Unknown,
}

impl Error {
    /// A metadata or usage error, described for the caller.
    pub fn mapping(message: impl Into<String>) -> Self {
        Self::from(ErrorKind::Mapping(message.into()))
    }

    /// A store transport failure.
    pub fn store(message: impl Into<String>) -> Self {
        Self::from(ErrorKind::Store(message.into()))
    }

    /// A value conversion failure. `value` names the variant that was found,
    /// `target` the shape that was requested.
    pub fn conversion(value: &'static str, target: &'static str) -> Self {
        Self::from(ErrorKind::Conversion { value, target })
    }

    #[doc(hidden)]
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Self {
        Self::from(ErrorKind::Mapping(args.to_string()))
    }

    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, ending with the root cause.
    pub fn context(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        let inner = err.inner.as_mut().unwrap();
        assert!(
            inner.cause.is_none(),
            "consequent error must not already have a cause"
        );
        Arc::get_mut(inner).unwrap().cause = Some(self);
        err
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind(), ErrorKind::Mapping(_))
    }

    pub fn is_store(&self) -> bool {
        matches!(self.kind(), ErrorKind::Store(_))
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            ErrorKind::Mapping(message) => f.write_str(message),
            ErrorKind::Store(message) => write!(f, "store error: {message}"),
            ErrorKind::Conversion { value, target } => {
                write!(f, "cannot convert {value} to {target}")
            }
            ErrorKind::Anyhow(err) => core::fmt::Display::fmt(err, f),
            ErrorKind::Unknown => f.write_str("unknown trellis error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}
