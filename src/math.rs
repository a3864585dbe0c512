use num::Float;

/// Similar to numpy.interp: evaluates the piecewise-linear curve through `coords`
/// at every point of `x_input`, holding the end values outside the covered range.
pub(crate) fn interp<F: Float>(
    x_input: impl IntoIterator<Item = F>,
    coords: impl IntoIterator<Item = (F, F)> + Clone,
) -> Vec<F> {
    x_input
        .into_iter()
        .map(|x| {
            let mut iter = coords.clone().into_iter().enumerate().peekable();
            let mut last = F::zero();

            while let Some((i, (x1, y1))) = iter.next() {
                last = y1;

                // Base cases
                if i == 0 && x < x1 {
                    return y1;
                }
                if iter.peek().is_none() && x > x1 {
                    return y1;
                }

                let Some(&(_, (x2, y2))) = iter.peek() else {
                    continue;
                };

                if x1 <= x && x <= x2 {
                    // Vertical segment
                    if x2 == x1 {
                        return y2;
                    }

                    return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
                }
            }

            last
        })
        .collect()
}

#[test]
fn test_interp() {
    let x = [0., 1., 1.5, 2.72, 3.24];
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];

    assert_eq!(
        interp(x, xs.into_iter().zip(ys)),
        vec![3., 3., 2.5, 0.5599999999999996, 0.]
    );

    let x = [2.5, -1., 7.5];
    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];

    assert_eq!(interp(x, xs.into_iter().zip(ys)), vec![4., 0., 2.]);
}

#[test]
fn test_interp_vertical_segment() {
    let xs = [0., 5., 5., 10.];
    let ys = [1., 1., 0., 0.];

    assert_eq!(interp([5., 7.5], xs.into_iter().zip(ys)), vec![1., 0.]);
}
