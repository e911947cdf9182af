use tracing::{debug, info, warn};

use crate::{
    client::WeatherClient,
    error::WidgetError,
    model::{FormValues, QueryParams},
    render::{Html, render_error, render_loading, render_weather},
};

/// The host surface the widget drives: form inputs, the output region and
/// the submit control.
pub trait Page {
    /// Current values of the city, unit and day-count inputs.
    fn read_form(&self) -> FormValues;

    /// Replace the whole output region.
    fn render(&self, html: Html);

    fn set_submit_disabled(&self, disabled: bool);
}

impl<P: Page + ?Sized> Page for &P {
    fn read_form(&self) -> FormValues {
        (**self).read_form()
    }

    fn render(&self, html: Html) {
        (**self).render(html)
    }

    fn set_submit_disabled(&self, disabled: bool) {
        (**self).set_submit_disabled(disabled)
    }
}

/// Form-to-endpoint controller. Holds no state between submits.
#[derive(Debug)]
pub struct WeatherWidget<C, P> {
    client: C,
    page: P,
}

impl<C: WeatherClient, P: Page> WeatherWidget<C, P> {
    pub fn new(client: C, page: P) -> Self {
        Self { client, page }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Read the form, query the endpoint and render the outcome.
    ///
    /// Never fails: every error ends as an error block in the output region.
    /// Overlapping calls are not serialized; whichever finishes last owns
    /// the output.
    pub async fn submit(&self) {
        let form = self.page.read_form();

        let params = match QueryParams::try_from(&form) {
            Ok(params) => params,
            Err(e) => {
                debug!(city = %form.city, "Rejected submit with empty city");
                self.show_error(&e);
                return;
            }
        };

        self.page.render(render_loading());
        let _submit = SubmitGuard::disable(&self.page);

        match self.client.fetch(&params).await {
            Ok(data) => {
                info!(city = params.city(), days = data.forecast.len(), "Rendering weather");
                self.page.render(render_weather(&data, params.city(), params.unit));
            }
            Err(e) => {
                warn!(city = params.city(), error = ?e, "Weather request failed");
                self.show_error(&e);
            }
        }
    }

    fn show_error(&self, err: &WidgetError) {
        self.page.render(render_error(&err.message()));
    }
}

/// Keeps the submit control disabled while alive. Re-enables it exactly once
/// on drop, including when the submit future is dropped mid-request.
struct SubmitGuard<'a, P: Page> {
    page: &'a P,
}

impl<'a, P: Page> SubmitGuard<'a, P> {
    fn disable(page: &'a P) -> Self {
        page.set_submit_disabled(true);
        Self { page }
    }
}

impl<P: Page> Drop for SubmitGuard<'_, P> {
    fn drop(&mut self) {
        self.page.set_submit_disabled(false);
    }
}
