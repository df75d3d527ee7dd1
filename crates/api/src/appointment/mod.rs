mod book_appointment;
mod cancel_appointment;
mod get_available_slots;
mod notify;
mod reschedule_appointment;
mod validate;

use actix_web::web;
use book_appointment::book_appointment_controller;
use cancel_appointment::cancel_appointment_controller;
use get_available_slots::get_available_slots_controller;
use reschedule_appointment::reschedule_appointment_controller;

pub use book_appointment::BookAppointmentUseCase;
pub use cancel_appointment::CancelAppointmentUseCase;
pub use get_available_slots::GetAvailableSlotsUseCase;
pub use reschedule_appointment::RescheduleAppointmentUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/slots", web::get().to(get_available_slots_controller));

    cfg.route("/appointments", web::post().to(book_appointment_controller));
    cfg.route(
        "/appointments/{cancel_token}",
        web::put().to(reschedule_appointment_controller),
    );
    cfg.route(
        "/appointments/{cancel_token}",
        web::delete().to(cancel_appointment_controller),
    );
}
