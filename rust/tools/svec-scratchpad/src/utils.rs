/// Evaluates the expression once, logs how long it took and returns its result.
#[macro_export]
macro_rules! time {
    ($expr:expr) => {{
        let __start = ::std::time::Instant::now();
        let __result = { $expr };
        let __ms = __start.elapsed().as_secs_f64() * 1000.0;
        ::log::info!("{} took {:.3} ms", stringify!($expr), __ms);
        ::std::hint::black_box(__result)
    }};
}

/// Parses the positional argument at `index`, falling back to `default` when it is
/// absent.
pub fn arg_or<T>(args: &[Option<&str>], index: usize, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match args.get(index).copied().flatten() {
        Some(s) => s
            .parse()
            .map_err(|e| anyhow::anyhow!("argument {index} ({s:?}): {e}")),
        None => Ok(default),
    }
}
